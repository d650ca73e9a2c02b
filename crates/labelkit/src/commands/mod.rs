//! Command dispatch: bridges CLI args -> store actions -> output formatting.

pub mod account;
pub mod config_cmd;
pub mod labels;
pub mod profile;
pub mod util;

use labelkit_core::SessionContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &SessionContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => account::login(ctx, args, global).await,
        Command::Register(args) => account::register(ctx, args, global).await,
        Command::ResetPassword { email } => account::reset_password(ctx, &email, global).await,
        Command::Logout => {
            account::logout(ctx, global);
            Ok(())
        }
        Command::Whoami => profile::show(ctx, global).await,
        Command::Profile(args) => profile::handle(ctx, args, global).await,
        Command::Labels(args) => labels::handle_labels(ctx, args, global).await,
        Command::Shipping(args) => labels::handle_shipping(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
