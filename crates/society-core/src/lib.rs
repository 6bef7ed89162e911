// society-core: Domain rules and shared services between society-api and the CLI.

pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod poller;
pub mod review;
pub mod session;
pub mod society;
pub mod validation;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{ClientConfig, TlsVerification};
pub use error::CoreError;
pub use filter::{AlertFilter, BillFilter, FilterSet, Predicate, UserFilter, ViolationFilter};
pub use poller::{AlertBadgePoller, AlertCounts};
pub use review::{BulkReview, BulkReviewOutcome};
pub use session::Session;
pub use society::Society;
pub use validation::{FieldError, ValidationErrors};
pub use workflow::AlertAction;

// Wire types double as the domain model.
pub use society_api::types;
