//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text
//! and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use unified_config::ConfigError;
use unified_store::StoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unified::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Self-signed certificate? Retry with --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(unified::tls_error),
        help("Check the ca_cert path in your profile, or use --insecure (-k).")
    )]
    TlsError { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(unified::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(unified::auth_failed),
        help(
            "Verify the username and password for this controller.\n\
             Store a password with: unified config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(unified::no_credentials),
        help(
            "Configure credentials with: unified config init\n\
             Or pass --username and set UNIFIED_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(unified::not_found),
        help("Run: unified {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(unified::api_error), help("{detail}"))]
    ApiError {
        status: u16,
        message: String,
        detail: String,
    },

    #[error("Controller rejected the request: {message}")]
    #[diagnostic(code(unified::rejected))]
    Rejected { message: String },

    #[error("Could not decode controller response: {message}")]
    #[diagnostic(
        code(unified::decode),
        help("Run with -vv to log the request, or inspect the raw body with: unified api get <path>")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unified::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(unified::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: unified config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(unified::no_config),
        help(
            "Create a profile with: unified config init\n\
             Or pass --controller. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(unified::config))]
    Config(#[from] ConfigError),

    // ── Document store ───────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(unified::store))]
    Store(StoreError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(unified::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(unified::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(unified::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// The `ls` command to suggest when a lookup comes back empty.
fn list_command_for(resource: &str) -> &'static str {
    match resource {
        "alarm" => "alarms ls",
        "event" => "events ls",
        "site" => "sites ls",
        "user" => "users ls",
        _ => "devices ls",
    }
}

// ── unified_api::Error → CliError ────────────────────────────────────

impl From<unified_api::Error> for CliError {
    fn from(err: unified_api::Error) -> Self {
        use unified_api::Error;

        match err {
            Error::InvalidArgument { argument, reason } => Self::Validation {
                field: argument.into(),
                reason,
            },

            Error::NotLoggedIn => Self::AuthFailed {
                message: "no active session".into(),
            },

            Error::Authentication { message } => Self::AuthFailed { message },

            Error::Transport(e) if e.is_timeout() => Self::Timeout,

            Error::Transport(e) => Self::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: Box::new(e),
            },

            Error::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            Error::Tls(reason) => Self::TlsError { reason },

            Error::Api(api) if matches!(api.status.as_u16(), 401 | 403) => Self::AuthFailed {
                message: api.message,
            },

            Error::Api(api) => Self::ApiError {
                status: api.status.as_u16(),
                detail: api.to_string(),
                message: api.message,
            },

            Error::Rejected { message } => Self::Rejected { message },

            Error::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource_type: resource.into(),
                identifier,
                list_command: list_command_for(resource).into(),
            },

            Error::Encode(e) => Self::Json(e),

            Error::Decode { message, .. } => Self::Decode { message },

            Error::Io(e) => Self::Io(e),
        }
    }
}

// ── StoreError → CliError ────────────────────────────────────────────

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoSuchCollection(name) => Self::NotFound {
                resource_type: "collection".into(),
                identifier: name,
                list_command: "db ls".into(),
            },
            StoreError::InvalidName(name) => Self::Validation {
                field: "collection".into(),
                reason: format!("invalid name {name:?}"),
            },
            other => Self::Store(other),
        }
    }
}
