//! Label and shipping label command handlers.

use tabled::Tabled;

use labelkit_core::{
    Label, LabelCategory, LabelKind, LabelStore, NewLabel, NewShippingLabel, PrintableLabel,
    Route, SessionContext,
};

use crate::cli::{
    GlobalOpts, LabelsArgs, LabelsCommand, RecordCommand, ShippingArgs, ShippingCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

fn created(label: &Label) -> String {
    label
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sender")]
    sender: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Label> for LabelRow {
    fn from(l: &Label) -> Self {
        Self {
            id: l.id.to_string(),
            sender: l.sender_name.clone().unwrap_or_default(),
            code: l.shipping_code.clone().unwrap_or_default(),
            created: created(l),
        }
    }
}

#[derive(Tabled)]
struct ShippingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sender")]
    sender: String,
    #[tabled(rename = "Recipient")]
    recipient: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Label> for ShippingRow {
    fn from(l: &Label) -> Self {
        Self {
            id: l.id.to_string(),
            sender: l.sender_name.clone().unwrap_or_default(),
            recipient: l.recipient_name.clone().unwrap_or_default(),
            address: l.recipient_address.clone().unwrap_or_default(),
            code: l.shipping_code.clone().unwrap_or_default(),
            created: created(l),
        }
    }
}

fn render_labels(kind: LabelKind, labels: &[Label], global: &GlobalOpts) {
    let id = |l: &Label| l.id.to_string();
    let out = match kind {
        LabelKind::Generic => {
            output::render_list(&global.output, labels, |l| LabelRow::from(l), id)
        }
        LabelKind::Shipping => {
            output::render_list(&global.output, labels, |l| ShippingRow::from(l), id)
        }
    };
    output::print_output(&out, global.quiet);
}

fn label_detail(l: &Label) -> String {
    output::detail_lines(&[
        ("ID", l.id.to_string()),
        ("Sender", l.sender_name.clone().unwrap_or_default()),
        ("Sender phone", l.sender_phone.clone().unwrap_or_default()),
        ("Recipient", l.recipient_name.clone().unwrap_or_default()),
        ("Address", l.recipient_address.clone().unwrap_or_default()),
        ("Recipient phone", l.recipient_phone.clone().unwrap_or_default()),
        ("Code", l.shipping_code.clone().unwrap_or_default()),
        ("Image", l.image_path.clone().unwrap_or_default()),
        ("Created", created(l)),
    ])
}

fn printable_detail(p: &PrintableLabel) -> String {
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Sender", p.sender_name.clone().unwrap_or_default()),
        ("Code", p.shipping_code.clone().unwrap_or_default()),
        ("Image", p.image_path.clone().unwrap_or_default()),
        ("QR data", p.qr_data.clone().unwrap_or_default()),
    ])
}

fn noun(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Generic => "label",
        LabelKind::Shipping => "shipping label",
    }
}

fn list_command(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Generic => "labels list",
        LabelKind::Shipping => "shipping list",
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_labels(
    ctx: &SessionContext,
    args: LabelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LabelsCommand::Create {
            sender_name,
            shipping_code,
        } => {
            util::enter(ctx, Route::CreateLabel, "labels create")?;
            let draft = NewLabel {
                sender_name,
                shipping_code,
            };
            create(ctx.labels(), &draft, global).await
        }
        LabelsCommand::Record(cmd) => record(ctx, ctx.labels(), cmd, global).await,
    }
}

pub async fn handle_shipping(
    ctx: &SessionContext,
    args: ShippingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ShippingCommand::Create {
            sender_name,
            sender_phone,
            recipient_name,
            recipient_address,
            recipient_phone,
            shipping_code,
        } => {
            util::enter(ctx, Route::CreateShippingLabel, "shipping create")?;
            let draft = NewShippingLabel {
                sender_name,
                sender_phone,
                recipient_name,
                recipient_address,
                recipient_phone,
                shipping_code,
            };
            create(ctx.shipping(), &draft, global).await
        }
        ShippingCommand::Record(cmd) => record(ctx, ctx.shipping(), cmd, global).await,
    }
}

async fn create<C: LabelCategory>(
    store: &LabelStore<C>,
    draft: &C::Draft,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pb = output::spinner(global, &format!("Creating {}", noun(C::KIND)));
    let result = store.create(draft).await;
    pb.finish_and_clear();
    let label = result.map_err(|e| not_found_hint(e.into(), C::KIND))?;

    output::success(global, &format!("Created {} {}", noun(C::KIND), label.id));
    let out = output::render_single(&global.output, &label, label_detail, |l| l.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Operations shared by both categories. Everything here sits behind
/// the dashboard view.
async fn record<C: LabelCategory>(
    ctx: &SessionContext,
    store: &LabelStore<C>,
    cmd: RecordCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let prefix = list_command(C::KIND).trim_end_matches(" list");
    util::enter(ctx, Route::Dashboard, prefix)?;
    let hint = |e: labelkit_core::CoreError| not_found_hint(e.into(), C::KIND);

    match cmd {
        RecordCommand::List => {
            let pb = output::spinner(global, &format!("Loading {}s", noun(C::KIND)));
            let result = store.fetch_list().await;
            pb.finish_and_clear();
            let labels = result.map_err(hint)?;
            render_labels(C::KIND, &labels, global);
            Ok(())
        }

        RecordCommand::Print { id } => {
            let printable = store.fetch_for_print(&util::parse_id(&id)).await.map_err(hint)?;
            let out = output::render_single(&global.output, &printable, printable_detail, |p| {
                p.qr_data.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Preview { id, out, url } => {
            let id = util::parse_id(&id);
            if url {
                let preview = store.preview_url(&id).map_err(hint)?;
                output::print_output(preview.as_str(), false);
                return Ok(());
            }
            let image = store.fetch_preview(&id).await.map_err(hint)?;
            let path = out.unwrap_or_else(|| {
                let ext = match image.content_type.as_deref() {
                    Some("image/jpeg") => "jpg",
                    Some("image/svg+xml") => "svg",
                    _ => "png",
                };
                format!("{}-{id}.{ext}", prefix.replace(' ', "-")).into()
            });
            std::fs::write(&path, &image.bytes)?;
            output::success(
                global,
                &format!("Saved preview ({} bytes) to {}", image.bytes.len(), path.display()),
            );
            Ok(())
        }

        RecordCommand::Delete { id } => {
            let id = util::parse_id(&id);
            if !util::confirm(&format!("Delete {} {id}?", noun(C::KIND)), global.yes)? {
                return Ok(());
            }
            store.delete(&id).await.map_err(hint)?;
            output::success(global, &format!("Deleted {} {id}", noun(C::KIND)));
            Ok(())
        }

        RecordCommand::BulkDelete { ids } => {
            let ids: Vec<_> = ids.iter().map(|raw| util::parse_id(raw)).collect();
            if !util::confirm(
                &format!("Delete {} {}s?", ids.len(), noun(C::KIND)),
                global.yes,
            )? {
                return Ok(());
            }
            let result = store.bulk_delete(&ids).await.map_err(hint)?;
            let deleted = result.deleted.map_or(ids.len(), |n| {
                usize::try_from(n).unwrap_or(usize::MAX)
            });
            output::success(global, &format!("Deleted {deleted} {}s", noun(C::KIND)));
            if !result.failed_ids.is_empty() {
                let failed: Vec<String> = result.failed_ids.iter().map(ToString::to_string).collect();
                output::notice(global, &format!("Not deleted: {}", failed.join(", ")));
            }
            Ok(())
        }
    }
}

/// Point not-found errors at the right list command.
fn not_found_hint(err: CliError, kind: LabelKind) -> CliError {
    match err {
        CliError::NotFound { message, .. } => CliError::NotFound {
            message,
            list_command: list_command(kind).into(),
        },
        other => other,
    }
}
