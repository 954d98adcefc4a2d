//! Clap derive structures for the `finboard` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// finboard -- admin dashboard for the financial modeling backend
#[derive(Debug, Parser)]
#[command(
    name = "finboard",
    version,
    about = "Admin dashboard for the financial modeling backend",
    long_about = "Inspect system stats, user activity, health, logs, audit trails and\n\
        security state of a financial modeling backend, and run maintenance\n\
        tasks, from the command line.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FINBOARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "FINBOARD_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (overrides profile and stored session)
    #[arg(long, env = "FINBOARD_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FINBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FINBOARD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FINBOARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Log in and store a session for the active profile
    Login(LoginArgs),

    /// End the session and remove stored credentials
    Logout,

    /// Overview tab: stats, user activity, and metrics
    #[command(alias = "ov")]
    Overview,

    /// Aggregate user, file, and financial-data counters
    Stats,

    /// Per-user activity
    Activity(ActivityArgs),

    /// CPU, memory, disk, and request gauges
    Metrics,

    /// Backend health checks
    Health,

    /// Security overview and session management
    #[command(alias = "sec")]
    Security(SecurityArgs),

    /// Application logs
    Logs(LogsArgs),

    /// Audit trail
    Audit(AuditArgs),

    /// Refresh every resource on a tab and report their status
    Refresh(RefreshArgs),

    /// Keep refreshing a tab on an interval
    Watch(WatchArgs),

    /// Maintenance status and tasks
    #[command(alias = "maint")]
    Maintenance(MaintenanceArgs),

    /// List and generate reports
    Reports(ReportsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted if omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "FINBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ActivityArgs {
    /// Max users to return (defaults to the profile's activity_limit)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct SecurityArgs {
    #[command(subcommand)]
    pub command: Option<SecurityCommand>,
}

#[derive(Debug, Subcommand)]
pub enum SecurityCommand {
    /// Show failed logins, locked accounts, and active sessions (default)
    Show,

    /// List active sessions
    Sessions,

    /// Terminate an active session
    Revoke {
        /// Session UUID
        id: String,
    },
}

// ── Paginated lists ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Minimum level
    #[arg(long)]
    pub level: Option<LevelArg>,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Start of range (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of range (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Page size (defaults to the profile's logs_page_size)
    #[arg(long, short = 'l')]
    pub limit: Option<u64>,

    /// Entries to skip
    #[arg(long, default_value = "0")]
    pub skip: u64,
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Filter by user ID
    #[arg(long)]
    pub user_id: Option<i64>,

    /// Filter by action (e.g. "login", "delete_file")
    #[arg(long, short = 'a')]
    pub action: Option<String>,

    /// Start of range (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of range (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Page size (defaults to the profile's audit_page_size)
    #[arg(long, short = 'l')]
    pub limit: Option<u64>,

    /// Entries to skip
    #[arg(long, default_value = "0")]
    pub skip: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORCHESTRATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Tab to refresh: overview, system, logs, audit, health
    /// (unknown names fall back to overview)
    #[arg(long, short = 't')]
    pub tab: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Tab to watch (defaults to the profile's default_tab)
    #[arg(long, short = 't')]
    pub tab: Option<String>,

    /// Refresh interval, e.g. "30s" or "2m" (defaults to the profile's)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<std::time::Duration>,

    /// Stop after this many refreshes
    #[arg(long, short = 'n')]
    pub count: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN OPERATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MaintenanceTaskArg {
    /// Remove orphaned and expired uploads
    CleanupFiles,
    /// Delete old application logs
    PurgeLogs,
    /// Reclaim database storage
    VacuumDatabase,
    /// Drop cached computations
    ClearCache,
}

#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Show maintenance mode, storage usage, and pending tasks
    Status,

    /// Run a maintenance task
    Run {
        task: MaintenanceTaskArg,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    UserActivity,
    SystemUsage,
    Audit,
    Financial,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List generated reports
    #[command(alias = "ls")]
    List,

    /// Queue a new report
    Generate {
        kind: ReportKindArg,

        /// Start of range (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End of range (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
