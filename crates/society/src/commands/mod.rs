//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod alerts;
pub mod auth;
pub mod billing;
pub mod config_cmd;
pub mod parking;
pub mod users;
pub mod util;

use society_core::Society;

use crate::cli::{Command, GlobalOpts};
use crate::config::ResolvedProfile;
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    society: &Society,
    profile: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(society, args, profile, global).await,
        Command::Alerts(args) => alerts::handle(society, args, global).await,
        Command::Parking(args) => parking::handle(society, args, global).await,
        Command::Billing(args) => billing::handle(society, args, global).await,
        Command::Users(args) => users::handle(society, args, global).await,
        // Handled before a server is resolved
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
