// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// `Society` facade validates each one locally before routing it to the
// matching endpoint.

use society_api::types::{
    Alert, BulkBillResult, Payment, ReviewAction, UpdateType, User, Violation,
};

use crate::review::BulkReviewOutcome;
use crate::validation::{BulkBillForm, ManualPaymentForm, NewAlertForm, UserUpdateForm};

/// All possible write operations against the backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Alerts ───────────────────────────────────────────────────────
    CreateAlert(Box<NewAlertForm>),
    AddAlertUpdate {
        id: String,
        message: String,
        update_type: UpdateType,
    },
    EscalateAlert {
        id: String,
        reason: String,
    },
    ResolveAlert {
        id: String,
        notes: String,
        proof_images: Vec<String>,
    },

    // ── Parking ──────────────────────────────────────────────────────
    ReviewViolation {
        id: String,
        action: ReviewAction,
        notes: Option<String>,
        fine_amount: Option<f64>,
    },
    BulkReviewViolations {
        ids: Vec<String>,
        action: ReviewAction,
        notes: Option<String>,
    },

    // ── Billing ──────────────────────────────────────────────────────
    GenerateBills(Box<BulkBillForm>),
    RecordPayment(Box<ManualPaymentForm>),

    // ── Users ────────────────────────────────────────────────────────
    UpdateUser {
        id: String,
        form: UserUpdateForm,
    },
    DeleteUser {
        id: String,
    },
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Alert(Box<Alert>),
    Violation(Box<Violation>),
    BulkReview(BulkReviewOutcome),
    BillsGenerated(BulkBillResult),
    Payment(Box<Payment>),
    User(Box<User>),
}
