// ── Alert workflow rules ──
//
// Client-side preconditions for alert actions. The server stays the
// authority; these checks only stop requests that are bound to fail and
// decide which actions a front-end offers.

use chrono::{DateTime, Utc};
use society_api::types::{Alert, AlertStatus, Escalation, User, UserRef};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::warn;

use crate::error::CoreError;

/// Mutating actions available on an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AlertAction {
    AddUpdate,
    Escalate,
    Resolve,
}

impl AlertAction {
    fn verb(self) -> &'static str {
        match self {
            Self::AddUpdate => "add an update to",
            Self::Escalate => "escalate",
            Self::Resolve => "resolve",
        }
    }
}

/// Status a new alert starts in: `scheduled` only for a future start.
pub fn initial_status(scheduled_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> AlertStatus {
    match scheduled_time {
        Some(at) if at > now => AlertStatus::Scheduled,
        _ => AlertStatus::Active,
    }
}

/// Check whether `user` may perform `action` on `alert` right now.
pub fn check_action(alert: &Alert, action: AlertAction, user: &User) -> Result<(), CoreError> {
    if alert.status != AlertStatus::Active {
        return Err(CoreError::InvalidTransition {
            entity: "alert",
            from: alert.status.to_string(),
            action: action.verb().into(),
        });
    }
    if action == AlertAction::Resolve && !alert.is_created_by(&user.id) {
        return Err(CoreError::NotAlertCreator {
            alert_id: alert.display_id().to_owned(),
        });
    }
    Ok(())
}

/// Actions whose preconditions currently hold for `user`.
pub fn available_actions(alert: &Alert, user: &User) -> Vec<AlertAction> {
    AlertAction::iter()
        .filter(|a| check_action(alert, *a, user).is_ok())
        .collect()
}

fn non_empty(field: &'static str, label: &str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CoreError::invalid(field, format!("{label} is required")))
    } else {
        Ok(value.to_owned())
    }
}

pub fn validate_escalation_reason(reason: &str) -> Result<String, CoreError> {
    non_empty("reason", "Escalation reason", reason)
}

pub fn validate_update_message(message: &str) -> Result<String, CoreError> {
    non_empty("message", "Update message", message)
}

pub fn validate_resolution_notes(notes: &str) -> Result<String, CoreError> {
    non_empty("resolution_notes", "Resolution notes", notes)
}

/// The escalation state after one more escalation. Levels only go up.
pub fn next_escalation(
    current: Option<&Escalation>,
    reason: &str,
    by: Option<UserRef>,
    at: DateTime<Utc>,
) -> Escalation {
    let level = current.map_or(0, |e| e.escalation_level);
    Escalation {
        is_escalated: true,
        escalation_level: level.saturating_add(1),
        escalation_reason: Some(reason.to_owned()),
        escalated_at: Some(at),
        escalated_by: by,
    }
}

/// Keep the client's view of escalation monotonic.
///
/// If the server echoes `after` with a lower level than `before` already
/// showed, the earlier escalation is kept.
pub fn reconcile_escalation(before: &Alert, after: &mut Alert) {
    let seen = before.escalation_level();
    let reported = after.escalation_level();
    if reported < seen {
        warn!(
            alert = %after.display_id(),
            seen,
            reported,
            "server reported a lower escalation level; keeping the higher one"
        );
        after.escalation.clone_from(&before.escalation);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use society_api::types::{AlertPriority, AlertType, Role, UserStatus, UserSummary, Visibility};

    use super::*;

    pub(crate) fn user(id: &str) -> User {
        User {
            id: id.into(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            role: Role::Admin,
            status: UserStatus::Active,
            flat_number: None,
            building: None,
            created_at: None,
        }
    }

    pub(crate) fn alert(status: AlertStatus, creator: &str) -> Alert {
        Alert {
            id: "a1".into(),
            alert_id: Some("ALT-0001".into()),
            title: "Water outage".into(),
            description: "Tank cleaning".into(),
            kind: AlertType::Water,
            priority: AlertPriority::High,
            status,
            visibility: Visibility::default(),
            created_by: UserRef::User(UserSummary {
                id: creator.into(),
                name: Some("Creator".into()),
                email: None,
            }),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(),
            start_time: None,
            scheduled_time: None,
            estimated_resolution_time: None,
            actual_resolution_time: None,
            updates: Vec::new(),
            escalation: None,
            resolution: None,
        }
    }

    #[test]
    fn initial_status_depends_on_future_schedule() {
        let now = Utc::now();
        assert_eq!(initial_status(None, now), AlertStatus::Active);
        assert_eq!(
            initial_status(Some(now + Duration::hours(2)), now),
            AlertStatus::Scheduled
        );
        assert_eq!(
            initial_status(Some(now - Duration::hours(2)), now),
            AlertStatus::Active
        );
    }

    #[test]
    fn creator_may_resolve_active_alert() {
        let a = alert(AlertStatus::Active, "u1");
        assert!(check_action(&a, AlertAction::Resolve, &user("u1")).is_ok());
    }

    #[test]
    fn non_creator_cannot_resolve() {
        let a = alert(AlertStatus::Active, "u1");
        let err = check_action(&a, AlertAction::Resolve, &user("u2")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotAlertCreator { ref alert_id } if alert_id == "ALT-0001"
        ));
    }

    #[test]
    fn inactive_alert_accepts_no_actions() {
        for status in [AlertStatus::Resolved, AlertStatus::Scheduled, AlertStatus::Cancelled] {
            let a = alert(status, "u1");
            assert!(available_actions(&a, &user("u1")).is_empty());
            assert!(matches!(
                check_action(&a, AlertAction::Escalate, &user("u1")),
                Err(CoreError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn available_actions_hide_resolve_from_others() {
        let a = alert(AlertStatus::Active, "u1");
        assert_eq!(
            available_actions(&a, &user("u2")),
            vec![AlertAction::AddUpdate, AlertAction::Escalate]
        );
        assert_eq!(available_actions(&a, &user("u1")).len(), 3);
    }

    #[test]
    fn blank_texts_are_rejected() {
        assert!(matches!(
            validate_escalation_reason("   "),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(validate_update_message("  Crew on site ").unwrap(), "Crew on site");
        assert!(validate_resolution_notes("").is_err());
    }

    #[test]
    fn repeated_escalation_only_increments() {
        let at = Utc::now();
        let mut current: Option<Escalation> = None;
        for expected in 1..=4 {
            let next = next_escalation(current.as_ref(), "still down", None, at);
            assert!(next.is_escalated);
            assert_eq!(next.escalation_level, expected);
            current = Some(next);
        }
    }

    #[test]
    fn reconcile_keeps_higher_level() {
        let mut before = alert(AlertStatus::Active, "u1");
        before.escalation = Some(next_escalation(None, "first", None, Utc::now()));
        before.escalation = Some(next_escalation(
            before.escalation.as_ref(),
            "second",
            None,
            Utc::now(),
        ));

        let mut after = alert(AlertStatus::Active, "u1");
        after.escalation = Some(next_escalation(None, "stale", None, Utc::now()));

        reconcile_escalation(&before, &mut after);
        assert_eq!(after.escalation_level(), 2);

        let mut newer = alert(AlertStatus::Active, "u1");
        newer.escalation = Some(next_escalation(
            before.escalation.as_ref(),
            "third",
            None,
            Utc::now(),
        ));
        reconcile_escalation(&before, &mut newer);
        assert_eq!(newer.escalation_level(), 3);
    }
}
