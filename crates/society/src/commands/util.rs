//! Shared helpers for command handlers.

use chrono::{DateTime, NaiveDate, Utc};

use society_core::types::{
    AlertPriority, AlertStatus, AlertType, BillStatus, BillType, ExportFormat, ListQuery,
    PaymentMethod, ReviewAction, Role, UpdateType, UserStatus, ViolationStatus, VisibilityScope,
};

use crate::cli::{
    AlertPriorityArg, AlertStatusArg, AlertTypeArg, BillStatusArg, BillTypeArg, ExportFormatArg,
    GlobalOpts, PageArgs, PaymentMethodArg, ReviewActionArg, RoleArg, ScopeArg, UpdateTypeArg,
    UserStatusArg, ViolationStatusArg,
};
use crate::error::CliError;
use crate::output;

// ── Value enum conversions ──────────────────────────────────────────

/// `From<cli arg>` for a wire enum with identically named variants.
macro_rules! arg_into {
    ($from:ident => $to:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$from> for $to {
            fn from(v: $from) -> Self {
                match v {
                    $($from::$variant => $to::$variant,)+
                }
            }
        }
    };
}

arg_into!(AlertTypeArg => AlertType {
    Water, Electricity, Gas, General, Maintenance, Security, Internet,
});
arg_into!(AlertPriorityArg => AlertPriority { Low, Medium, High, Critical });
arg_into!(AlertStatusArg => AlertStatus { Active, Resolved, Scheduled, Cancelled });
arg_into!(UpdateTypeArg => UpdateType { Info, Progress, Delay, Warning });
arg_into!(ScopeArg => VisibilityScope { All, Building, Floor, Unit });
arg_into!(ViolationStatusArg => ViolationStatus {
    Pending, UnderReview, Approved, Rejected, Resolved, Dismissed,
});
arg_into!(ReviewActionArg => ReviewAction { Approve, Reject, Dismiss });
arg_into!(ExportFormatArg => ExportFormat { Csv, Json });
arg_into!(BillStatusArg => BillStatus { Pending, Paid, PartiallyPaid, Overdue, Cancelled });
arg_into!(BillTypeArg => BillType { Maintenance, Water, Electricity, Parking, Other });
arg_into!(PaymentMethodArg => PaymentMethod {
    Cash, Cheque, Upi, Card, NetBanking, BankTransfer, Online,
});
arg_into!(RoleArg => Role { Resident, Admin, Security });
arg_into!(UserStatusArg => UserStatus { Active, Inactive, Pending, Suspended });

// ── Arguments ───────────────────────────────────────────────────────

/// Query for page `page` of `limit` items.
pub fn page_query(page: &PageArgs) -> ListQuery {
    ListQuery::page(page.page.max(1), page.limit.max(1))
}

/// Accepts RFC 3339 (`2026-01-05T09:30:00Z`) or a bare date, read as
/// midnight UTC.
pub fn parse_time(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::Usage {
            field: field.into(),
            reason: format!("expected RFC 3339 or YYYY-MM-DD, got '{value}'"),
        })
}

pub fn parse_time_opt(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, CliError> {
    value.map(|v| parse_time(field, v)).transpose()
}

// ── Interaction ─────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Usage {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

pub fn color(global: &GlobalOpts) -> bool {
    output::should_color(global.color)
}

// ── Display ─────────────────────────────────────────────────────────

/// Local-time `YYYY-MM-DD HH:MM`, or empty.
pub fn fmt_time(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn fmt_money(amount: f64) -> String {
    format!("{amount:.2}")
}
