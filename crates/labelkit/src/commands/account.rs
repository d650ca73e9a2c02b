//! Sign-in, registration, password reset, and sign-out.

use dialoguer::Input;
use labelkit_core::{Registration, Route, SessionContext};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// True when the guard bounces `route` because a session is active. The
/// stored token is verified first; an expired one ends the session.
async fn already_signed_in(ctx: &SessionContext, route: Route) -> bool {
    if !ctx.session().is_authenticated() {
        return false;
    }
    if let Err(e) = ctx.session().current_user().await {
        tracing::debug!(error = %e, "stored session is no longer valid");
    }
    ctx.navigate(route) != route
}

pub async fn login(ctx: &SessionContext, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if already_signed_in(ctx, Route::Login).await {
        output::notice(
            global,
            &format!(
                "Already signed in as {}. Run `labelkit logout` to switch accounts.",
                ctx.session().user_name()
            ),
        );
        return Ok(());
    }

    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = util::password(args.password)?;

    let pb = output::spinner(global, "Signing in");
    let result = ctx.session().login(&email, &password).await;
    pb.finish_and_clear();
    result?;

    let labels = ctx.labels().snapshot().labels.len();
    let shipping = ctx.shipping().snapshot().labels.len();
    output::success(
        global,
        &format!(
            "Signed in as {} ({labels} labels, {shipping} shipping labels)",
            ctx.session().user_name()
        ),
    );
    Ok(())
}

pub async fn register(
    ctx: &SessionContext,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if already_signed_in(ctx, Route::Register).await {
        output::notice(
            global,
            "Already signed in. Run `labelkit logout` before creating another account.",
        );
        return Ok(());
    }

    let registration = Registration {
        name: args.name,
        email: args.email,
        password: util::password(args.password)?,
    };
    let pb = output::spinner(global, "Creating account");
    let result = ctx.session().register(&registration).await;
    pb.finish_and_clear();
    result?;

    output::success(
        global,
        &format!(
            "Account created for {}. Sign in with: labelkit login",
            registration.email
        ),
    );
    Ok(())
}

pub async fn reset_password(
    ctx: &SessionContext,
    email: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::enter(ctx, Route::ResetPassword, "reset-password")?;
    ctx.session().reset_password(email).await?;
    output::success(global, &format!("Password reset requested for {email}"));
    Ok(())
}

pub fn logout(ctx: &SessionContext, global: &GlobalOpts) {
    let was_signed_in = ctx.session().is_authenticated();
    ctx.session().logout();
    if was_signed_in {
        output::success(global, "Signed out");
    } else {
        output::notice(global, "Not signed in");
    }
}
