// ── Filter predicates for in-memory pages ──
//
// Front-ends filter the page they already hold instead of re-querying.
// Predicates compose with AND inside a `FilterSet`, so the result does not
// depend on the order they were added in.

use chrono::{DateTime, Utc};
use society_api::types::{
    Alert, AlertPriority, AlertStatus, AlertType, Bill, BillStatus, BillType, Role, User,
    UserStatus, Violation, ViolationStatus,
};

/// Something that can accept or reject an item.
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Case-insensitive substring match. An empty needle matches everything.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ci(h, needle))
}

// ── Alerts ──────────────────────────────────────────────────────────

/// Filter predicate for alert collections.
pub enum AlertFilter {
    All,
    /// Title or description.
    Search(String),
    Status(AlertStatus),
    Type(AlertType),
    Priority(AlertPriority),
    Escalated,
    Custom(Box<dyn Fn(&Alert) -> bool + Send + Sync>),
}

impl Predicate<Alert> for AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        match self {
            Self::All => true,
            Self::Search(q) => {
                let q = q.trim();
                contains_ci(&alert.title, q) || contains_ci(&alert.description, q)
            }
            Self::Status(s) => alert.status == *s,
            Self::Type(t) => alert.kind == *t,
            Self::Priority(p) => alert.priority == *p,
            Self::Escalated => alert.is_escalated(),
            Self::Custom(f) => f(alert),
        }
    }
}

// ── Violations ──────────────────────────────────────────────────────

/// Filter predicate for parking violations.
pub enum ViolationFilter {
    All,
    /// Vehicle number, location or description.
    Search(String),
    Status(ViolationStatus),
    /// Category name, case-insensitive.
    Category(String),
}

impl Predicate<Violation> for ViolationFilter {
    fn matches(&self, v: &Violation) -> bool {
        match self {
            Self::All => true,
            Self::Search(q) => {
                let q = q.trim();
                contains_ci(&v.vehicle_number, q)
                    || opt_contains_ci(v.location.as_deref(), q)
                    || opt_contains_ci(v.description.as_deref(), q)
            }
            Self::Status(s) => v.status == *s,
            Self::Category(name) => v.category.name.eq_ignore_ascii_case(name.trim()),
        }
    }
}

// ── Bills ───────────────────────────────────────────────────────────

/// Filter predicate for bills.
pub enum BillFilter {
    All,
    /// Bill number or description.
    Search(String),
    Status(BillStatus),
    Type(BillType),
    /// Overdue as of the given instant.
    Overdue(DateTime<Utc>),
}

impl Predicate<Bill> for BillFilter {
    fn matches(&self, bill: &Bill) -> bool {
        match self {
            Self::All => true,
            Self::Search(q) => {
                let q = q.trim();
                opt_contains_ci(bill.bill_number.as_deref(), q)
                    || opt_contains_ci(bill.description.as_deref(), q)
            }
            Self::Status(s) => bill.status == *s,
            Self::Type(t) => bill.bill_type == *t,
            Self::Overdue(now) => bill.is_overdue(*now),
        }
    }
}

// ── Users ───────────────────────────────────────────────────────────

/// Filter predicate for users.
pub enum UserFilter {
    All,
    /// Name, email or flat number.
    Search(String),
    Role(Role),
    Status(UserStatus),
}

impl Predicate<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Search(q) => {
                let q = q.trim();
                contains_ci(&user.name, q)
                    || contains_ci(&user.email, q)
                    || opt_contains_ci(user.flat_number.as_deref(), q)
            }
            Self::Role(r) => user.role == *r,
            Self::Status(s) => user.status == *s,
        }
    }
}

// ── Composition ─────────────────────────────────────────────────────

/// AND-composition of predicates. An empty set accepts everything.
pub struct FilterSet<P> {
    predicates: Vec<P>,
}

impl<P> Default for FilterSet<P> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<P> FilterSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: P) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: P) {
        self.predicates.push(predicate);
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Items accepted by every predicate, in input order.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T>
    where
        P: Predicate<T>,
    {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

impl<T, P: Predicate<T>> Predicate<T> for FilterSet<P> {
    fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(item))
    }
}

impl<P> FromIterator<P> for FilterSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}
