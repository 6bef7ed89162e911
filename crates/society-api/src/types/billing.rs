// ── Billing payloads ──

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::alert::VisibilityScope;
use super::user::UserRef;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BillStatus {
    Pending,
    Paid,
    PartiallyPaid,
    Overdue,
    Cancelled,
}

impl BillStatus {
    /// Paid and cancelled bills are settled; nothing more is owed.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BillType {
    Maintenance,
    Water,
    Electricity,
    Parking,
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PaymentMethod {
    Cash,
    Cheque,
    Upi,
    Card,
    NetBanking,
    BankTransfer,
    Online,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub description: String,
    pub amount: f64,
}

/// A due raised against a resident or flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub resident: Option<UserRef>,
    #[serde(default)]
    pub flat_number: Option<String>,
    pub bill_type: BillType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<BillItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: BillStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn display_id(&self) -> &str {
        self.bill_number.as_deref().unwrap_or(&self.id)
    }

    /// Amount still owed, never negative.
    pub fn outstanding(&self) -> f64 {
        (self.total_amount - self.paid_amount).max(0.0)
    }

    /// Unsettled, with a balance, and past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_settled() && self.outstanding() > 0.0 && self.due_date < now
    }

    /// Whole days past the due date; zero when not overdue.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if self.is_overdue(now) {
            (now - self.due_date).num_days()
        } else {
            0
        }
    }
}

/// A bill reference: a bare id, or the populated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillRef {
    Id(String),
    Bill {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(rename = "billNumber", default)]
        bill_number: Option<String>,
    },
}

impl BillRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Bill { id, .. } => id,
        }
    }
}

/// A settlement (full or partial) of a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub bill: Option<BillRef>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recorded_by: Option<UserRef>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn display_id(&self) -> &str {
        self.payment_id.as_deref().unwrap_or(&self.id)
    }
}

/// Admin collection dashboard figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingAnalytics {
    pub total_billed: f64,
    pub total_collected: f64,
    pub total_outstanding: f64,
    pub overdue_count: u64,
    pub collection_rate: f64,
    pub by_status: HashMap<String, u64>,
}

// ── Requests / results ──────────────────────────────────────────────

/// Which flats a bulk bill run targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTarget {
    pub scope: VisibilityScope,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buildings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBillRequest {
    pub bill_type: BillType,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub description: String,
    pub target: BillTarget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkBillResult {
    pub generated: u32,
    pub skipped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualPaymentRequest {
    pub bill_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}
