//! Auth command handlers.

use dialoguer::Input;
use secrecy::SecretString;

use society_config::ConfigError;
use society_core::Society;
use society_core::types::User;
use society_core::validation::{LoginForm, RegistrationForm};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::ResolvedProfile;
use crate::error::CliError;
use crate::output;

use super::util;

/// Detail view shared with `users show`.
pub fn user_detail(u: &User) -> String {
    output::detail_lines(&[
        ("ID", u.id.clone()),
        ("Name", u.name.clone()),
        ("Email", u.email.clone()),
        ("Phone", u.phone.clone().unwrap_or_default()),
        ("Role", u.role.to_string()),
        ("Status", u.status.to_string()),
        ("Flat", u.flat_number.clone().unwrap_or_default()),
        ("Building", u.building.clone().unwrap_or_default()),
        ("Joined", util::fmt_time(u.created_at)),
    ])
}

fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(util::prompt_err)
}

/// Stored password for the profile, or an interactive prompt.
fn login_password(profile: &ResolvedProfile) -> Result<SecretString, CliError> {
    match society_config::resolve_password(&profile.profile, &profile.name) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) => prompt_password("Password: "),
        Err(e) => Err(e.into()),
    }
}

pub async fn handle(
    society: &Society,
    args: AuthArgs,
    profile: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = society.session();

    match args.command {
        AuthCommand::Login { email } => {
            let email = match email.or_else(|| profile.profile.email.clone()) {
                Some(e) => e,
                None => Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(util::prompt_err)?,
            };
            let password = login_password(profile)?;

            let user = session.login(&LoginForm { email, password }).await?;
            output::notice(
                &format!(
                    "Signed in as {} ({}) on profile '{}'",
                    user.name, user.role, profile.name
                ),
                global.quiet,
            );
            Ok(())
        }

        AuthCommand::Register {
            name,
            email,
            phone,
            flat,
            building,
        } => {
            let password = prompt_password("Password: ")?;
            let confirm_password = prompt_password("Confirm password: ")?;

            let form = RegistrationForm {
                name,
                email,
                phone,
                password,
                confirm_password,
                flat_number: flat,
                building,
            };
            let user = session.register(&form).await?;
            output::notice(
                &format!("Registered and signed in as {}", user.email),
                global.quiet,
            );
            Ok(())
        }

        AuthCommand::Logout => {
            session.logout().await?;
            output::notice("Signed out", global.quiet);
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = session.init().await?.ok_or(CliError::NotSignedIn)?;
            let out = output::render_single(global.output, &user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
