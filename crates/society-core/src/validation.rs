// ── Form validation ──
//
// Every form collects all of its field errors and only then produces the
// request body. Nothing here touches the network, so a rejected form never
// costs a round trip.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use society_api::types::{
    AlertPriority, AlertType, BillTarget, BillType, BulkBillRequest, CreateAlertRequest,
    LoginRequest, ManualPaymentRequest, PaymentMethod, RegisterRequest, Role, UpdateUserRequest,
    UserStatus, Visibility, VisibilityScope,
};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TITLE_LEN: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

// ── Error collection ────────────────────────────────────────────────

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors of one form, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// `true` when `field` has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing was collected.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }

    fn require(&mut self, field: &'static str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Field rules ─────────────────────────────────────────────────────

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "Email is invalid");
    }
}

fn check_phone(errors: &mut ValidationErrors, phone: &str) {
    if phone.trim().is_empty() {
        errors.push("phone", "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.push("phone", "Phone number must be 10 digits");
    }
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── Auth forms ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.expose_secret().is_empty() {
            errors.push("password", "Password is required");
        }
        errors.finish(|| LoginRequest {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub flat_number: Option<String>,
    pub building: Option<String>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name");
        check_email(&mut errors, &self.email);
        check_phone(&mut errors, &self.phone);

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.push("password", "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if password != self.confirm_password.expose_secret() {
            errors.push("confirm_password", "Passwords do not match");
        }

        errors.finish(|| RegisterRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            password: self.password.clone(),
            flat_number: trimmed(self.flat_number.as_ref()),
            building: trimmed(self.building.as_ref()),
        })
    }
}

// ── Alert form ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewAlertForm {
    pub title: String,
    pub description: String,
    pub kind: AlertType,
    pub priority: AlertPriority,
    pub visibility: Visibility,
    pub start_time: Option<DateTime<Utc>>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub estimated_resolution_time: Option<DateTime<Utc>>,
}

impl NewAlertForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        kind: AlertType,
        priority: AlertPriority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            priority,
            visibility: Visibility::default(),
            start_time: None,
            scheduled_time: None,
            estimated_resolution_time: None,
        }
    }

    /// `now` anchors the "estimated resolution not before start" rule when
    /// neither a start nor a scheduled time is given.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<CreateAlertRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title");
        if self.title.trim().chars().count() > MAX_TITLE_LEN {
            errors.push(
                "title",
                format!("Title must be at most {MAX_TITLE_LEN} characters"),
            );
        }
        errors.require("description", &self.description, "Description");

        if self.visibility.scope != VisibilityScope::All && self.visibility.targets().is_empty() {
            errors.push(
                "visibility",
                format!("Select at least one {} for this alert", self.visibility.scope),
            );
        }

        let start = self.start_time.or(self.scheduled_time).unwrap_or(now);
        if let Some(eta) = self.estimated_resolution_time {
            if eta < start {
                errors.push(
                    "estimated_resolution_time",
                    "Estimated resolution cannot be before the start time",
                );
            }
        }

        errors.finish(|| CreateAlertRequest {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            kind: self.kind,
            priority: self.priority,
            visibility: self.visibility.clone(),
            start_time: self.start_time,
            scheduled_time: self.scheduled_time,
            estimated_resolution_time: self.estimated_resolution_time,
        })
    }
}

// ── User administration form ────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UserUpdateForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub flat_number: Option<String>,
    pub building: Option<String>,
}

impl UserUpdateForm {
    pub fn validate(&self) -> Result<UpdateUserRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.require("name", name, "Name");
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        if let Some(phone) = &self.phone {
            check_phone(&mut errors, phone);
        }

        let request = UpdateUserRequest {
            name: trimmed(self.name.as_ref()),
            email: trimmed(self.email.as_ref()),
            phone: trimmed(self.phone.as_ref()),
            role: self.role,
            status: self.status,
            flat_number: trimmed(self.flat_number.as_ref()),
            building: trimmed(self.building.as_ref()),
        };
        if errors.is_empty() && request.is_empty() {
            errors.push("form", "Nothing to update");
        }
        errors.finish(|| request)
    }
}

// ── Billing forms ───────────────────────────────────────────────────

fn check_amount(errors: &mut ValidationErrors, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        errors.push("amount", "Amount must be greater than zero");
    }
}

#[derive(Debug, Clone)]
pub struct ManualPaymentForm {
    pub bill_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl ManualPaymentForm {
    pub fn validate(&self) -> Result<ManualPaymentRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("bill_id", &self.bill_id, "Bill");
        check_amount(&mut errors, self.amount);
        errors.finish(|| ManualPaymentRequest {
            bill_id: self.bill_id.trim().to_owned(),
            amount: self.amount,
            method: self.method,
            transaction_id: trimmed(self.transaction_id.as_ref()),
            notes: trimmed(self.notes.as_ref()),
            paid_at: self.paid_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BulkBillForm {
    pub bill_type: BillType,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub description: String,
    pub target: BillTarget,
}

impl BulkBillForm {
    pub fn validate(&self) -> Result<BulkBillRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_amount(&mut errors, self.amount);
        errors.require("description", &self.description, "Description");

        match self.target.scope {
            VisibilityScope::All => {}
            VisibilityScope::Building if self.target.buildings.is_empty() => {
                errors.push("target", "Select at least one building");
            }
            VisibilityScope::Unit if self.target.units.is_empty() => {
                errors.push("target", "Select at least one unit");
            }
            VisibilityScope::Floor => {
                errors.push("target", "Bills can target all flats, buildings or units");
            }
            VisibilityScope::Building | VisibilityScope::Unit => {}
        }

        errors.finish(|| BulkBillRequest {
            bill_type: self.bill_type,
            amount: self.amount,
            due_date: self.due_date,
            description: self.description.trim().to_owned(),
            target: self.target.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn secret(s: &str) -> SecretString {
        s.to_string().into()
    }

    fn registration() -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            password: secret("hunter22"),
            confirm_password: secret("hunter22"),
            flat_number: Some(" A-101 ".into()),
            building: None,
        }
    }

    #[test]
    fn email_rule() {
        assert!(is_valid_email("asha@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("asha@example"));
    }

    #[test]
    fn phone_rule() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("98765-43210"));
        assert!(!is_valid_phone("98765432101"));
    }

    #[test]
    fn valid_registration_produces_trimmed_request() {
        let request = registration().validate().unwrap();
        assert_eq!(request.flat_number.as_deref(), Some("A-101"));
        assert_eq!(request.building, None);
    }

    #[test]
    fn registration_collects_every_error() {
        let form = RegistrationForm {
            email: "not-an-email".into(),
            phone: "12345".into(),
            confirm_password: secret("different"),
            ..registration()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
        assert!(errors.has("confirm_password"));
    }

    #[test]
    fn short_password_is_rejected() {
        let form = RegistrationForm {
            password: secret("abc"),
            confirm_password: secret("abc"),
            ..registration()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            email: String::new(),
            password: secret(""),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.to_string(), "Email is required; Password is required");
    }

    #[test]
    fn scoped_alert_needs_targets() {
        let mut form = NewAlertForm::new(
            "Lift down",
            "Block B lift",
            AlertType::Maintenance,
            AlertPriority::Medium,
        );
        form.visibility.scope = VisibilityScope::Building;
        let now = Utc::now();

        assert!(form.validate(now).unwrap_err().has("visibility"));

        form.visibility.buildings.push("B".into());
        assert!(form.validate(now).is_ok());
    }

    #[test]
    fn eta_before_start_is_rejected() {
        let start = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        let mut form = NewAlertForm::new(
            "Power cut",
            "Grid work",
            AlertType::Electricity,
            AlertPriority::High,
        );
        form.start_time = Some(start);
        form.estimated_resolution_time = Some(start - Duration::hours(1));

        let errors = form.validate(start).unwrap_err();
        assert!(errors.has("estimated_resolution_time"));
    }

    #[test]
    fn empty_user_update_is_rejected() {
        let errors = UserUpdateForm::default().validate().unwrap_err();
        assert!(errors.has("form"));

        let form = UserUpdateForm {
            status: Some(UserStatus::Suspended),
            ..UserUpdateForm::default()
        };
        assert_eq!(form.validate().unwrap().status, Some(UserStatus::Suspended));
    }

    #[test]
    fn payments_and_bills_need_positive_amounts() {
        let payment = ManualPaymentForm {
            bill_id: "b1".into(),
            amount: 0.0,
            method: PaymentMethod::Cash,
            transaction_id: None,
            notes: None,
            paid_at: None,
        };
        assert!(payment.validate().unwrap_err().has("amount"));

        let bills = BulkBillForm {
            bill_type: BillType::Maintenance,
            amount: -5.0,
            due_date: Utc::now(),
            description: " ".into(),
            target: BillTarget::default(),
        };
        let errors = bills.validate().unwrap_err();
        assert!(errors.has("amount"));
        assert!(errors.has("description"));
    }
}
