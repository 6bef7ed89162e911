//! CLI configuration: a thin layer over `society_config` that applies
//! `GlobalOpts` overrides (--profile, --server, --insecure, --timeout).

use society_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use society_config::{
    Config, FileTokenStore, Profile, config_path, load_config_or_default, save_config,
};

/// A profile after flag overrides, ready to build a `Society`.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
    pub client: ClientConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated, sorted profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Merge the config file with global flags. Flags win over profile values.
///
/// Without a stored profile a `--server` flag is enough; an explicitly
/// requested profile that does not exist is an error either way.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<ResolvedProfile, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None if global.server.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let client = society_config::profile_to_client_config(&profile, &config.defaults)?;
    Ok(ResolvedProfile {
        name,
        profile,
        client,
    })
}
