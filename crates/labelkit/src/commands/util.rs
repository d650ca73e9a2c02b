//! Shared helpers for command handlers.

use labelkit_core::{EntityId, Route, SessionContext};

use crate::error::CliError;

/// Pass the navigation guard for `route`. A protected view without a
/// session is refused instead of silently redirected.
pub fn enter(ctx: &SessionContext, route: Route, command: &str) -> Result<(), CliError> {
    let landed = ctx.navigate(route);
    if route.requires_auth() && landed == Route::Login {
        return Err(CliError::LoginRequired {
            command: command.into(),
        });
    }
    tracing::debug!(route = %landed, "entered view");
    Ok(())
}

pub fn parse_id(raw: &str) -> EntityId {
    EntityId::from(raw.trim())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Password from the flag/env value, else an interactive prompt.
pub fn password(given: Option<String>) -> Result<secrecy::SecretString, CliError> {
    let raw = match given {
        Some(pw) => pw,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(secrecy::SecretString::from(raw))
}
