//! Clap derive structures for the `society` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! This file is also compiled by `build.rs` for man page generation, so it
//! must only depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// society -- manage a residential society from the command line
#[derive(Debug, Parser)]
#[command(
    name = "society",
    version,
    about = "Manage a Society Ease residential community from the command line",
    long_about = "Command-line client for the Society Ease backend.\n\n\
        Raise and track community alerts, review parking violations,\n\
        generate bills and manage residents.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "SOCIETY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. https://society.example/api (overrides profile)
    #[arg(long, short = 's', env = "SOCIETY_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SOCIETY_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SOCIETY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SOCIETY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Yaml,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Command tree ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, register and inspect the current session
    Auth(AuthArgs),

    /// Community alerts: outages, maintenance and security notices
    Alerts(AlertsArgs),

    /// Parking violation review (admin)
    Parking(ParkingArgs),

    /// Bills, payments and collection analytics
    Billing(BillingArgs),

    /// Resident and staff accounts (admin)
    Users(UsersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Server-side pagination shared by list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and store tokens for the active profile
    Login {
        /// Login email (defaults to the profile's email)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Create a resident account and sign in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long, short = 'e')]
        email: String,

        /// 10-digit phone number
        #[arg(long)]
        phone: String,

        #[arg(long)]
        flat: Option<String>,

        #[arg(long)]
        building: Option<String>,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        status: Option<AlertStatusArg>,

        #[arg(long = "type")]
        kind: Option<AlertTypeArg>,

        #[arg(long)]
        priority: Option<AlertPriorityArg>,

        /// Match title or description
        #[arg(long)]
        search: Option<String>,

        /// Only escalated alerts
        #[arg(long)]
        escalated: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// List currently active alerts
    Active,

    /// Show one alert with its update history
    Show {
        /// Alert id
        id: String,
    },

    /// Raise a new alert
    Create {
        title: String,

        #[arg(long, short = 'd')]
        description: String,

        #[arg(long = "type", default_value = "general")]
        kind: AlertTypeArg,

        #[arg(long, default_value = "medium")]
        priority: AlertPriorityArg,

        /// Who sees the alert
        #[arg(long, default_value = "all")]
        scope: ScopeArg,

        /// Building, floor or unit the scope refers to (repeatable)
        #[arg(long = "target")]
        targets: Vec<String>,

        /// Start time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Schedule for later (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        scheduled: Option<String>,

        /// Estimated resolution time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        eta: Option<String>,
    },

    /// Post a progress update on an active alert
    Update {
        id: String,

        message: String,

        #[arg(long = "type", default_value = "info")]
        update_type: UpdateTypeArg,
    },

    /// Escalate an active alert
    Escalate { id: String, reason: String },

    /// Resolve an active alert you created
    Resolve {
        id: String,

        notes: String,

        /// Proof image URL (repeatable)
        #[arg(long = "proof")]
        proof: Vec<String>,
    },

    /// Watch the active alert counts
    Watch {
        /// Refresh interval in seconds (defaults to the profile's poll interval)
        #[arg(long, short = 'i')]
        interval: Option<u64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PARKING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ParkingArgs {
    #[command(subcommand)]
    pub command: ParkingCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParkingCommand {
    /// List violations
    #[command(alias = "ls")]
    List {
        /// Only violations awaiting review
        #[arg(long)]
        pending: bool,

        #[arg(long)]
        status: Option<ViolationStatusArg>,

        /// Match vehicle number, location or description
        #[arg(long)]
        search: Option<String>,

        /// Category name
        #[arg(long)]
        category: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Review a single violation
    Review {
        id: String,

        action: ReviewActionArg,

        #[arg(long)]
        notes: Option<String>,

        /// Override the category fine
        #[arg(long)]
        fine: Option<f64>,
    },

    /// Apply one decision to several violations
    BulkReview {
        #[arg(required_unless_present = "all_pending")]
        ids: Vec<String>,

        /// Select every reviewable violation on the first pending page
        #[arg(long, conflicts_with = "ids")]
        all_pending: bool,

        #[arg(long, short = 'a')]
        action: ReviewActionArg,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Export violations as CSV or JSON
    Export {
        #[arg(long, short = 'f', default_value = "csv")]
        format: ExportFormatArg,

        #[arg(long)]
        status: Option<ViolationStatusArg>,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BILLING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BillingArgs {
    #[command(subcommand)]
    pub command: BillingCommand,
}

#[derive(Debug, Subcommand)]
pub enum BillingCommand {
    /// List bills (your own, or every resident's with --admin)
    Bills {
        #[arg(long)]
        admin: bool,

        #[arg(long)]
        status: Option<BillStatusArg>,

        #[arg(long = "type")]
        bill_type: Option<BillTypeArg>,

        /// Only bills past their due date with money outstanding
        #[arg(long)]
        overdue: bool,

        /// Match bill number or description
        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one bill
    Show { id: String },

    /// List your payments
    Payments {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Collection analytics (admin)
    Analytics,

    /// Generate bills for a group of units (admin)
    Generate {
        #[arg(long = "type")]
        bill_type: BillTypeArg,

        #[arg(long)]
        amount: f64,

        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: String,

        #[arg(long, short = 'd')]
        description: String,

        #[arg(long, default_value = "all")]
        scope: ScopeArg,

        /// Building or unit the scope refers to (repeatable)
        #[arg(long = "target")]
        targets: Vec<String>,
    },

    /// Record an offline payment against a bill (admin)
    RecordPayment {
        bill_id: String,

        #[arg(long)]
        amount: f64,

        #[arg(long, default_value = "cash")]
        method: PaymentMethodArg,

        #[arg(long)]
        transaction_id: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        role: Option<RoleArg>,

        #[arg(long)]
        status: Option<UserStatusArg>,

        /// Match name, email or flat number
        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one user
    Show { id: String },

    /// Change a user's details, role or status
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'e')]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        role: Option<RoleArg>,

        #[arg(long)]
        status: Option<UserStatusArg>,

        #[arg(long)]
        flat: Option<String>,

        #[arg(long)]
        building: Option<String>,
    },

    /// Delete a user
    Delete { id: String },
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
    /// Create a profile with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
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

// ── Value enums ──────────────────────────────────────────────────────
//
// Mirrors of the wire enums so this file stays clap-only. Converted in
// `commands::util`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertTypeArg {
    Water,
    Electricity,
    Gas,
    General,
    Maintenance,
    Security,
    Internet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertPriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlertStatusArg {
    Active,
    Resolved,
    Scheduled,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateTypeArg {
    Info,
    Progress,
    Delay,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    All,
    Building,
    Floor,
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViolationStatusArg {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Resolved,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReviewActionArg {
    Approve,
    Reject,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BillStatusArg {
    Pending,
    Paid,
    PartiallyPaid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BillTypeArg {
    Maintenance,
    Water,
    Electricity,
    Parking,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentMethodArg {
    Cash,
    Cheque,
    Upi,
    Card,
    NetBanking,
    BankTransfer,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Resident,
    Admin,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UserStatusArg {
    Active,
    Inactive,
    Pending,
    Suspended,
}
