//! Clap derive structures for the `unified` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it to
//! render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOP-LEVEL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// unified -- talk to a UniFi controller from the command line
#[derive(Debug, Parser)]
#[command(
    name = "unified",
    version,
    about = "Query and control a UniFi controller over its session API",
    long_about = "Log in to a UniFi controller, list alarms, events, devices, sites and \
                  users, drive access points and client stations, and optionally mirror \
                  results into a local document store.",
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

#[derive(Debug, Default, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "UNIFIED_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "UNIFIED_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name or ID
    #[arg(long, short = 's', env = "UNIFIED_SITE", global = true)]
    pub site: Option<String>,

    /// Controller account
    #[arg(long, short = 'u', env = "UNIFIED_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(
        long,
        env = "UNIFIED_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "UNIFIED_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "UNIFIED_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Mirror list results into the local document store
    #[arg(long, short = 'b', global = true)]
    pub use_db: bool,

    /// Document store directory (overrides profile)
    #[arg(long, env = "UNIFIED_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
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

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Controller alarms
    #[command(alias = "alarm")]
    Alarms(AlarmsArgs),

    /// Controller events
    #[command(alias = "event")]
    Events(EventsArgs),

    /// Adopted devices (access points, gateways, switches)
    #[command(alias = "dev", alias = "device")]
    Devices(DevicesArgs),

    /// Access point control
    #[command(alias = "uap")]
    Ap(ApArgs),

    /// Client station control (block, guest authorization)
    #[command(alias = "cl", alias = "client")]
    Clients(ClientsArgs),

    /// Known client records
    #[command(alias = "user")]
    Users(UsersArgs),

    /// Sites visible to the logged-in account
    #[command(alias = "site")]
    Sites(SitesArgs),

    /// Send a raw request and stream the response body
    Api(ApiArgs),

    /// Inspect and clean the local document store
    Db(DbArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHARED ARGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, Args)]
pub struct ListArgs {
    /// Page number (0 = server default)
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Records per page (0 = server default)
    #[arg(long, default_value = "0")]
    pub per_page: u32,
}

/// `ls` / `get ID` pair shared by the read-only resources.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get one record by numeric ID
    Get {
        /// Record ID (1 or greater)
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALARMS / EVENTS / USERS / SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceKind {
    All,
    Uap,
    Ugw,
    Usw,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List adopted devices (summary view)
    #[command(alias = "ls")]
    List {
        /// Only show devices of this type
        #[arg(long = "type", short = 't', value_enum, default_value = "all")]
        kind: DeviceKind,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get full device details by numeric ID
    Get {
        /// Device ID (1 or greater)
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Show full device details by MAC address
    Inspect {
        /// Device MAC address
        mac: String,
    },

    /// Print a device's IP address
    Ip {
        /// Device MAC address
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCESS POINTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApArgs {
    #[command(subcommand)]
    pub command: ApCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApCommand {
    /// Blink the locate LED
    Locate {
        /// Access point MAC address
        mac: String,

        /// Turn locate off instead
        #[arg(long)]
        off: bool,
    },

    /// Report whether the locate LED is on
    Locating {
        /// Access point MAC address
        mac: String,
    },

    /// Restart an access point
    Restart {
        /// Access point MAC address
        mac: String,
    },

    /// Disable an access point
    Disable {
        /// Access point MAC address
        mac: String,
    },

    /// Re-enable a disabled access point
    Enable {
        /// Access point MAC address
        mac: String,
    },

    /// Set an access point's display name
    Rename {
        /// Access point MAC address
        mac: String,

        /// New display name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// Block a client station
    Block {
        /// Client MAC address
        mac: String,
    },

    /// Unblock a client station
    Unblock {
        /// Client MAC address
        mac: String,
    },

    /// Authorize a guest on the hotspot
    AuthorizeGuest {
        /// Guest MAC address
        mac: String,

        /// Authorization duration in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Upload limit in Kbps
        #[arg(long)]
        up: Option<u32>,

        /// Download limit in Kbps
        #[arg(long)]
        down: Option<u32>,

        /// Data transfer limit in MB
        #[arg(long)]
        mb: Option<u64>,

        /// MAC of the access point the guest is attached to
        #[arg(long)]
        ap_mac: Option<String>,
    },

    /// Revoke a guest authorization
    UnauthorizeGuest {
        /// Guest MAC address
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RAW API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    /// HTTP method
    #[arg(value_enum, ignore_case = true)]
    pub method: HttpMethod,

    /// Path relative to the site base (`stat/health`) or the controller
    /// root when it starts with `/` (`/api/self`)
    pub path: String,

    /// JSON request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOCUMENT STORE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CleanTarget {
    All,
    Alarms,
    Events,
    Devices,
    Sites,
    Users,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// List stored collections with document counts
    #[command(alias = "ls")]
    List,

    /// Show every document in a collection
    Show {
        /// Collection name (e.g. Alarms)
        collection: String,
    },

    /// Drop stored collections
    Clean {
        /// What to drop
        #[arg(value_enum, default_value = "all")]
        target: CleanTarget,
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
    /// Interactive configuration wizard
    Init,

    /// Show the resolved configuration (passwords masked)
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
