// ── Violation review ──
//
// Single and bulk admin review. A bulk review goes out as one request and
// reports per-item outcomes; failed items are not retried, their ids are
// handed back so the operator can re-select them.

use std::collections::HashSet;

use society_api::types::{
    BulkReviewRequest, BulkReviewResult, ReviewAction, ReviewRequest, Violation,
};

use crate::error::CoreError;

/// A validated bulk review selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReview {
    ids: Vec<String>,
    action: ReviewAction,
    notes: Option<String>,
}

impl BulkReview {
    /// Trims and de-duplicates `ids`, keeping first-seen order.
    pub fn new<I, S>(ids: I, action: ReviewAction, notes: Option<String>) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_owned())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        if ids.is_empty() {
            return Err(CoreError::invalid(
                "violation_ids",
                "Select at least one violation",
            ));
        }

        let notes = notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        Ok(Self { ids, action, notes })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn action(&self) -> ReviewAction {
        self.action
    }

    pub fn into_request(self) -> BulkReviewRequest {
        BulkReviewRequest {
            violation_ids: self.ids,
            action: self.action,
            notes: self.notes,
        }
    }
}

/// What a bulk review achieved, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReviewOutcome {
    pub successful: u32,
    pub failed: u32,
    pub failed_ids: Vec<String>,
    pub message: String,
}

impl BulkReviewOutcome {
    pub fn from_result(action: ReviewAction, result: &BulkReviewResult) -> Self {
        let failed_ids: Vec<String> = result
            .results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.violation_id.clone())
            .collect();

        let mut message = format!(
            "{} violation(s) {}",
            result.successful,
            action.target_status()
        );
        if result.failed > 0 {
            message.push_str(&format!(", {} failed", result.failed));
        }

        Self {
            successful: result.successful,
            failed: result.failed,
            failed_ids,
            message,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

/// Client-side hint that `violation` can take `action`.
pub fn check_reviewable(violation: &Violation, action: ReviewAction) -> Result<(), CoreError> {
    let target = action.target_status();
    if violation.status.is_reviewable() && violation.status.can_transition_to(target) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "violation",
            from: violation.status.to_string(),
            action: action.to_string(),
        })
    }
}

/// Ids of the violations that can take `action`, in input order.
pub fn reviewable_ids(violations: &[Violation], action: ReviewAction) -> Vec<String> {
    violations
        .iter()
        .filter(|v| check_reviewable(v, action).is_ok())
        .map(|v| v.id.clone())
        .collect()
}

/// Build a single review request. A fine override must not be negative.
pub fn review_request(
    action: ReviewAction,
    notes: Option<String>,
    fine_amount: Option<f64>,
) -> Result<ReviewRequest, CoreError> {
    if let Some(fine) = fine_amount {
        if !fine.is_finite() || fine < 0.0 {
            return Err(CoreError::invalid(
                "fine_amount",
                "Fine amount cannot be negative",
            ));
        }
    }
    Ok(ReviewRequest {
        action,
        notes: notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty()),
        fine_amount,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use society_api::types::{BulkItemResult, ViolationCategory, ViolationStatus};

    use super::*;

    fn violation(status: ViolationStatus) -> Violation {
        Violation {
            id: "v1".into(),
            violation_id: Some("PV-0001".into()),
            category: ViolationCategory {
                id: "c1".into(),
                name: "No parking zone".into(),
                fine_amount: 500.0,
                description: None,
            },
            vehicle_number: "KA01AB1234".into(),
            location: Some("Gate 2".into()),
            description: None,
            reported_by: None,
            status,
            fine_amount: None,
            evidence: Vec::new(),
            appeal: None,
            admin_review: None,
            timeline: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ids_are_trimmed_and_deduplicated_in_order() {
        let review =
            BulkReview::new([" v2", "v1", "v2 ", "", "v3"], ReviewAction::Approve, None).unwrap();
        assert_eq!(review.ids(), ["v2", "v1", "v3"]);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = BulkReview::new(["  "], ReviewAction::Reject, None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn outcome_lists_failed_ids() {
        let mut results: Vec<BulkItemResult> = (1..=5)
            .map(|i| BulkItemResult {
                violation_id: format!("v{i}"),
                success: true,
                error: None,
            })
            .collect();
        results.push(BulkItemResult {
            violation_id: "bogus".into(),
            success: false,
            error: Some("Violation not found".into()),
        });
        let result = BulkReviewResult {
            successful: 5,
            failed: 1,
            results,
        };

        let outcome = BulkReviewOutcome::from_result(ReviewAction::Approve, &result);
        assert_eq!(outcome.successful, 5);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failed_ids, vec!["bogus".to_string()]);
        assert_eq!(outcome.message, "5 violation(s) approved, 1 failed");
        assert!(!outcome.is_complete_success());
    }

    #[test]
    fn only_pending_or_under_review_is_reviewable() {
        let ok = |status, action| check_reviewable(&violation(status), action).is_ok();
        assert!(ok(ViolationStatus::Pending, ReviewAction::Approve));
        assert!(ok(ViolationStatus::UnderReview, ReviewAction::Dismiss));
        assert!(!ok(ViolationStatus::Approved, ReviewAction::Reject));
        assert!(!ok(ViolationStatus::Resolved, ReviewAction::Approve));
    }

    #[test]
    fn selection_skips_settled_violations() {
        let mut settled = violation(ViolationStatus::Approved);
        settled.id = "v2".into();
        let mut waiting = violation(ViolationStatus::UnderReview);
        waiting.id = "v3".into();
        let page = [violation(ViolationStatus::Pending), settled, waiting];

        assert_eq!(
            reviewable_ids(&page, ReviewAction::Reject),
            vec!["v1".to_owned(), "v3".to_owned()]
        );
    }

    #[test]
    fn negative_fine_is_rejected() {
        assert!(review_request(ReviewAction::Approve, None, Some(-1.0)).is_err());
        let request =
            review_request(ReviewAction::Approve, Some("  ".into()), Some(750.0)).unwrap();
        assert_eq!(request.notes, None);
        assert_eq!(request.fine_amount, Some(750.0));
    }
}
