// ── Users and authentication payloads ──

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Resident,
    Admin,
    Security,
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
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Suspended,
}

/// A registered member of the society.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub flat_number: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The populated form of a user reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A reference to a user: a bare id, or the populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    User(UserSummary),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::User(u) => &u.id,
        }
    }

    /// Name when populated, otherwise the id.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::User(u) => u.name.as_deref().unwrap_or(&u.id),
        }
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "super::expose_secret")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(serialize_with = "super::expose_secret")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Partial update of a user. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// `data` of a successful login or registration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// `data` of a successful token refresh.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_ref_accepts_id_or_document() {
        let bare: UserRef = serde_json::from_value(json!("u1")).unwrap();
        assert_eq!(bare.id(), "u1");

        let populated: UserRef =
            serde_json::from_value(json!({ "_id": "u2", "name": "Asha" })).unwrap();
        assert_eq!(populated.id(), "u2");
        assert_eq!(populated.display_name(), "Asha");
    }

    #[test]
    fn login_request_exposes_password_only_on_the_wire() {
        let req = LoginRequest {
            email: "a@b.co".into(),
            password: SecretString::from("hunter22".to_string()),
        };
        assert!(!format!("{req:?}").contains("hunter22"));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["password"], "hunter22");
    }

    #[test]
    fn auth_response_debug_hides_tokens() {
        let resp: AuthResponse = serde_json::from_value(json!({
            "user": { "_id": "u1", "name": "A", "email": "a@b.co", "role": "resident" },
            "accessToken": "tok-abc",
            "refreshToken": "ref-xyz"
        }))
        .unwrap();
        let dbg = format!("{resp:?}");
        assert!(!dbg.contains("tok-abc"));
        assert!(!dbg.contains("ref-xyz"));
    }
}
