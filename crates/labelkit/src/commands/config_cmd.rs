//! Config subcommand handlers.

use dialoguer::{Input, Select};
use labelkit_config::{self as shared, Config, TokenConfig, TokenStorage};
use labelkit_core::Locale;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn show_detail(cfg: &Config) -> String {
    let storage = match cfg.token.storage {
        TokenStorage::File => {
            let dir = cfg.token.dir.clone().unwrap_or_else(shared::data_dir);
            format!("file ({})", dir.display())
        }
        TokenStorage::Keyring => format!("keyring (service '{}')", shared::KEYRING_SERVICE),
    };
    output::detail_lines(&[
        ("API URL", cfg.api_url.clone()),
        ("Timeout", format!("{}s", cfg.timeout)),
        ("Locale", cfg.locale.to_string()),
        ("Output", cfg.defaults.output.clone()),
        ("Color", cfg.defaults.color.clone()),
        ("Token", storage),
        ("Config file", shared::config_path().display().to_string()),
    ])
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let current = shared::load_config_or_default();
            eprintln!("labelkit configuration");
            eprintln!("   Config path: {}\n", shared::config_path().display());

            let api_url: String = Input::new()
                .with_prompt("Label service URL")
                .default(current.api_url.clone())
                .validate_with(|input: &String| {
                    url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let timeout: u64 = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(current.timeout)
                .interact_text()
                .map_err(prompt_err)?;

            let locales = &["English", "Bahasa Indonesia"];
            let locale = match Select::new()
                .with_prompt("Language for error messages")
                .items(locales)
                .default(usize::from(current.locale == Locale::Id))
                .interact()
                .map_err(prompt_err)?
            {
                1 => Locale::Id,
                _ => Locale::En,
            };

            let stores = &["File in the data directory", "System keyring"];
            let storage = match Select::new()
                .with_prompt("Where to keep the session token?")
                .items(stores)
                .default(usize::from(current.token.storage == TokenStorage::Keyring))
                .interact()
                .map_err(prompt_err)?
            {
                1 => TokenStorage::Keyring,
                _ => TokenStorage::File,
            };

            let cfg = Config {
                api_url,
                timeout,
                locale,
                token: TokenConfig {
                    storage,
                    dir: current.token.dir.clone(),
                },
                ..current
            };
            cfg.session_config()?;
            let path = shared::save_config(&cfg)?;

            output::success(global, &format!("Configuration written to {}", path.display()));
            output::notice(global, "Next: labelkit login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let out = output::render_single(&global.output, &cfg, show_detail, |c| {
                c.api_url.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&shared::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
