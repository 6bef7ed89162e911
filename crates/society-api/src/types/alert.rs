// ── Alert payloads ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::user::UserRef;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertType {
    Water,
    Electricity,
    Gas,
    General,
    Maintenance,
    Security,
    Internet,
}

/// Declared low → critical so `Ord` follows severity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertStatus {
    Active,
    Resolved,
    Scheduled,
    Cancelled,
}

impl AlertStatus {
    /// Resolved and cancelled alerts never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }

    /// `scheduled → active → {resolved | cancelled}`; a scheduled alert
    /// may also be cancelled before it starts.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Active | Self::Cancelled)
                | (Self::Active, Self::Resolved | Self::Cancelled)
        )
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
pub enum VisibilityScope {
    /// Society-wide.
    #[default]
    All,
    Building,
    Floor,
    Unit,
}

/// Who can see an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Visibility {
    pub scope: VisibilityScope,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buildings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub floors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
}

impl Visibility {
    /// The target list that must be non-empty for the current scope.
    pub fn targets(&self) -> &[String] {
        match self.scope {
            VisibilityScope::All => &[],
            VisibilityScope::Building => &self.buildings,
            VisibilityScope::Floor => &self.floors,
            VisibilityScope::Unit => &self.units,
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
pub enum UpdateType {
    #[default]
    Info,
    Progress,
    Delay,
    Warning,
}

/// One entry of an alert's append-only update log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdate {
    pub message: String,
    #[serde(default)]
    pub update_type: UpdateType,
    #[serde(default)]
    pub updated_by: Option<UserRef>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escalation {
    #[serde(default)]
    pub is_escalated: bool,
    #[serde(default)]
    pub escalation_level: u32,
    #[serde(default)]
    pub escalation_reason: Option<String>,
    #[serde(default)]
    pub escalated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub escalated_by: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub proof_images: Vec<String>,
    #[serde(default)]
    pub resolved_by: Option<UserRef>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

/// A society-wide or scoped notice about a service disruption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub alert_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub priority: AlertPriority,
    pub status: AlertStatus,
    #[serde(default)]
    pub visibility: Visibility,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_resolution_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_resolution_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updates: Vec<AlertUpdate>,
    #[serde(default)]
    pub escalation: Option<Escalation>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
}

impl Alert {
    /// Human-facing identifier (`alertId` when present, else the document id).
    pub fn display_id(&self) -> &str {
        self.alert_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_escalated(&self) -> bool {
        self.escalation.as_ref().is_some_and(|e| e.is_escalated)
    }

    pub fn escalation_level(&self) -> u32 {
        self.escalation.as_ref().map_or(0, |e| e.escalation_level)
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.created_by.id() == user_id
    }

    /// Updates sorted by timestamp. The server appends in order; sorting is
    /// stable so equal timestamps keep their arrival order.
    pub fn updates_in_order(&self) -> Vec<&AlertUpdate> {
        let mut updates: Vec<&AlertUpdate> = self.updates.iter().collect();
        updates.sort_by_key(|u| u.timestamp);
        updates
    }
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub priority: AlertPriority,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_resolution_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUpdateRequest {
    pub message: String,
    pub update_type: UpdateType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscalateRequest {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub resolution_notes: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proof_images: Vec<String>,
}
