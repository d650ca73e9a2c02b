//! Profile view and edit.

use labelkit_core::{ProfileUpdate, Route, SessionContext, UserProfile};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(user: &UserProfile) -> String {
    let mut pairs = vec![
        ("ID", user.id.as_ref().map(ToString::to_string).unwrap_or_default()),
        ("Name", user.name.clone().unwrap_or_default()),
        ("Email", user.email.clone().unwrap_or_default()),
    ];
    for (key, value) in &user.extra {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        pairs.push((key.as_str(), rendered));
    }
    output::detail_lines(&pairs)
}

fn render(user: &UserProfile, global: &GlobalOpts) {
    let out = output::render_single(&global.output, user, detail, |u| {
        u.email.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
}

/// Load the profile of the stored session. A rejected token ends the
/// session, which surfaces as an authentication error.
async fn load(ctx: &SessionContext) -> Result<UserProfile, CliError> {
    ctx.session()
        .current_user()
        .await?
        .ok_or_else(|| CliError::LoginRequired {
            command: "whoami".into(),
        })
}

pub async fn show(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::enter(ctx, Route::Dashboard, "whoami")?;
    let user = load(ctx).await?;
    render(&user, global);
    Ok(())
}

pub async fn handle(
    ctx: &SessionContext,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => show(ctx, global).await,

        ProfileCommand::Update { name, email } => {
            let update = ProfileUpdate { name, email };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "pass --name and/or --email".into(),
                });
            }
            util::enter(ctx, Route::ProfileEdit, "profile update")?;
            load(ctx).await?;
            let user = ctx.session().update_profile(&update).await?;
            output::success(global, "Profile updated");
            render(&user, global);
            Ok(())
        }
    }
}
