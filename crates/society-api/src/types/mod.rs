//! Wire types for the Society Ease REST API.
//!
//! Every response is wrapped in the `{ success, message, data, errors }`
//! envelope. Field names are camelCase and Mongo-style identifiers arrive
//! as `_id` (some endpoints also emit `id`; both are accepted).

mod alert;
mod billing;
mod envelope;
mod parking;
mod user;

pub use alert::*;
pub use billing::*;
pub use envelope::*;
pub use parking::*;
pub use user::*;

use secrecy::{ExposeSecret, SecretString};
use serde::Serializer;

/// `serialize_with` helper for request bodies that carry a password.
pub(crate) fn expose_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
