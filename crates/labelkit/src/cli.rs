//! Clap derive structures for the `labelkit` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// labelkit -- create, list, and print labels from the command line
#[derive(Debug, Parser)]
#[command(
    name = "labelkit",
    version,
    about = "Create, list, and print product and shipping labels",
    long_about = "Client for the label printing service.\n\n\
        Sign in once with `labelkit login`; the session token is kept on\n\
        disk (or in the system keyring) until you log out or it expires.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Label service URL (overrides config)
    #[arg(long, short = 'u', env = "LABELKIT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LABELKIT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Language for error messages (en, id)
    #[arg(long, env = "LABELKIT_LOCALE", global = true)]
    pub locale: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "LABELKIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session token
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Request a password reset email
    ResetPassword {
        /// Account email address
        email: String,
    },

    /// Sign out and forget the session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// View or edit your profile
    Profile(ProfileArgs),

    /// Manage product labels
    #[command(alias = "l")]
    Labels(LabelsArgs),

    /// Manage shipping labels
    #[command(alias = "ship", alias = "s")]
    Shipping(ShippingArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email address (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "LABELKIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Account email address
    #[arg(long, short = 'e')]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(long, env = "LABELKIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in user
    Show,

    /// Change name and/or email
    Update {
        /// New display name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New email address
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
}

// ── Labels ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LabelsCommand {
    /// Create a product label
    #[command(alias = "new")]
    Create {
        /// Sender shown on the label
        #[arg(long)]
        sender_name: String,

        /// Code encoded in the label's QR image
        #[arg(long)]
        shipping_code: String,
    },

    #[command(flatten)]
    Record(RecordCommand),
}

#[derive(Debug, Args)]
pub struct ShippingArgs {
    #[command(subcommand)]
    pub command: ShippingCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShippingCommand {
    /// Create a shipping label
    #[command(alias = "new")]
    Create {
        #[arg(long)]
        sender_name: String,

        #[arg(long)]
        sender_phone: String,

        #[arg(long)]
        recipient_name: String,

        #[arg(long)]
        recipient_address: String,

        #[arg(long)]
        recipient_phone: String,

        /// Tracking code (generated by the service when omitted)
        #[arg(long, default_value = "")]
        shipping_code: String,
    },

    #[command(flatten)]
    Record(RecordCommand),
}

/// Operations shared by both label categories.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List your labels, newest first
    #[command(alias = "ls")]
    List,

    /// Show the print payload for a label
    Print {
        /// Label ID
        id: String,
    },

    /// Download a label's preview image
    Preview {
        /// Label ID
        id: String,

        /// Write the image to this file
        #[arg(long, short = 'f', conflicts_with = "url")]
        out: Option<PathBuf>,

        /// Print the token-bearing preview URL instead of downloading
        #[arg(long)]
        url: bool,
    },

    /// Delete a label
    #[command(alias = "rm")]
    Delete {
        /// Label ID
        id: String,
    },

    /// Delete several labels in one request
    BulkDelete {
        /// Label IDs
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
