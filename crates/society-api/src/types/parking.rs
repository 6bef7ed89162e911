// ── Parking violation payloads ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::user::UserRef;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViolationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Resolved,
    Dismissed,
}

impl ViolationStatus {
    /// Statuses an admin review can act on.
    pub fn is_reviewable(self) -> bool {
        matches!(self, Self::Pending | Self::UnderReview)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }

    /// `pending → under_review → {approved | rejected} → {resolved | dismissed}`.
    /// A review may also settle a pending or under-review violation directly.
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::UnderReview | Self::Approved | Self::Rejected | Self::Dismissed
            ),
            Self::UnderReview => matches!(next, Self::Approved | Self::Rejected | Self::Dismissed),
            Self::Approved | Self::Rejected => matches!(next, Self::Resolved | Self::Dismissed),
            Self::Resolved | Self::Dismissed => false,
        }
    }
}

/// Admin review verdict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReviewAction {
    Approve,
    Reject,
    Dismiss,
}

impl ReviewAction {
    /// Status a reviewable violation ends up in after this action.
    pub fn target_status(self) -> ViolationStatus {
        match self {
            Self::Approve => ViolationStatus::Approved,
            Self::Reject => ViolationStatus::Rejected,
            Self::Dismiss => ViolationStatus::Dismissed,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AppealStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Violation category with its fine schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCategory {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fine_amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appeal {
    pub reason: String,
    #[serde(default)]
    pub status: AppealStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReview {
    #[serde(default)]
    pub reviewed_by: Option<UserRef>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action: Option<ReviewAction>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One audit entry of a violation's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub action: String,
    #[serde(default)]
    pub performed_by: Option<UserRef>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A reported parking infraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub violation_id: Option<String>,
    pub category: ViolationCategory,
    pub vehicle_number: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reported_by: Option<UserRef>,
    pub status: ViolationStatus,
    /// Fine actually levied; falls back to the category schedule when absent.
    #[serde(default)]
    pub fine_amount: Option<f64>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub appeal: Option<Appeal>,
    #[serde(default)]
    pub admin_review: Option<AdminReview>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
}

impl Violation {
    pub fn display_id(&self) -> &str {
        self.violation_id.as_deref().unwrap_or(&self.id)
    }

    pub fn effective_fine(&self) -> f64 {
        self.fine_amount.unwrap_or(self.category.fine_amount)
    }

    pub fn has_pending_appeal(&self) -> bool {
        self.appeal
            .as_ref()
            .is_some_and(|a| a.status == AppealStatus::Pending)
    }
}

// ── Requests / results ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub action: ReviewAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReviewRequest {
    pub violation_ids: Vec<String>,
    pub action: ReviewAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult {
    pub violation_id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-item counts the server reports for a bulk review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkReviewResult {
    pub successful: u32,
    pub failed: u32,
    pub results: Vec<BulkItemResult>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn review_targets_are_reachable_from_reviewable_states() {
        for status in ViolationStatus::iter().filter(|s| s.is_reviewable()) {
            for action in ReviewAction::iter() {
                assert!(
                    status.can_transition_to(action.target_status()),
                    "{status} -> {action}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_do_not_move() {
        for next in ViolationStatus::iter() {
            assert!(!ViolationStatus::Resolved.can_transition_to(next));
            assert!(!ViolationStatus::Dismissed.can_transition_to(next));
        }
    }

    #[test]
    fn violation_falls_back_to_category_fine() {
        let v: Violation = serde_json::from_value(json!({
            "_id": "v1",
            "category": { "_id": "c1", "name": "No parking zone", "fineAmount": 500.0 },
            "vehicleNumber": "MH12AB1234",
            "status": "under_review",
            "createdAt": "2026-09-30T12:00:00Z",
            "appeal": { "reason": "Visitor pass" }
        }))
        .unwrap();
        assert_eq!(v.status, ViolationStatus::UnderReview);
        assert!((v.effective_fine() - 500.0).abs() < f64::EPSILON);
        assert!(v.has_pending_appeal());
        assert_eq!(v.display_id(), "v1");
    }
}
