// ── Runtime connection configuration ──
//
// Describes how to reach a Society Ease server. Built by the CLI from a
// profile and handed in; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use society_api::{TlsMode, TransportConfig};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only for local development servers.
    DangerAcceptInvalid,
}

/// Configuration for talking to one Society Ease deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://society.example/api`.
    pub server: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Alert badge refresh period.
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
