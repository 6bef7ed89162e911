//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};
use url::Url;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Format config for display, masking the plaintext password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(poll) = p.poll_interval {
            let _ = writeln!(out, "poll_interval = {poll}");
        }
    }

    out.trim_end().to_owned()
}

/// Copy of `cfg` with plaintext passwords masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

fn read_password(prompt: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Usage {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Ask where the password should live. Returns the plaintext value when
/// the user picks the config file.
fn prompt_password_storage(profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store; ask at login",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match selection {
        0 => {
            let password = read_password("Password: ")?;
            society_config::store_password(profile_name, &password)?;
            eprintln!("   Password stored in system keyring");
            Ok(None)
        }
        1 => Ok(Some(read_password("Password: ")?)),
        _ => Ok(None),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("Society Ease CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(global.profile.clone().unwrap_or_else(|| "default".into()))
                .interact_text()
                .map_err(prompt_err)?;

            if cfg.profiles.contains_key(&profile_name)
                && !Confirm::new()
                    .with_prompt(format!("Profile '{profile_name}' exists. Overwrite?"))
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                return Ok(());
            }

            let server: String = Input::new()
                .with_prompt("API root URL")
                .default(
                    global
                        .server
                        .clone()
                        .unwrap_or_else(|| "http://localhost:5000/api".into()),
                )
                .validate_with(|s: &String| {
                    Url::parse(s).map(|_| ()).map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Login email (blank to ask each time)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let password = prompt_password_storage(&profile_name)?;

            let profile = Profile {
                server,
                email: Some(email).filter(|e| !e.trim().is_empty()),
                password,
                insecure: global.insecure.then_some(true),
                timeout: global.timeout,
                ..Profile::default()
            };

            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Sign in with: society auth login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: society config init");
                return Ok(());
            }
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            let lines: Vec<String> = names
                .into_iter()
                .map(|name| {
                    if name == default {
                        format!("{name} *")
                    } else {
                        name.clone()
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }

            let password = read_password("Password: ")?;
            society_config::store_password(&profile_name, &password)?;
            output::notice(
                &format!("Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                server: "https://society.example/api".into(),
                email: Some("admin@society.example".into()),
                password: Some("hunter22".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_plaintext_password() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.home]"));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter22"));
    }

    #[test]
    fn structured_output_is_redacted_too() {
        let cfg = redacted(&sample());
        assert_eq!(cfg.profiles["home"].password.as_deref(), Some("****"));
        assert_eq!(
            cfg.profiles["home"].email.as_deref(),
            Some("admin@society.example")
        );
    }
}
