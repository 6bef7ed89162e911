// society-api: Async Rust client for the Society Ease REST API

pub mod client;
pub mod error;
pub mod tokens;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use tokens::{MemoryTokenStore, TokenPair, TokenStore};
pub use transport::{TlsMode, TransportConfig};
