//! CLI configuration: thin layer over `unified_config`.
//!
//! Applies `GlobalOpts` flag overrides (--controller, --site, --insecure,
//! ...) on top of the active profile and resolves credentials, falling back
//! to an interactive password prompt.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;
use url::Url;

use unified_api::{TlsMode, TransportConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Render};

pub use unified_config::{Config, Defaults, Profile, config_path, load_config, save_config};

/// Everything needed to open a controller session.
pub struct Connection {
    pub profile_name: String,
    pub controller: Url,
    pub site: String,
    pub username: String,
    pub password: SecretString,
    pub transport: TransportConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Load the config file, or defaults when there is none.
///
/// A file that exists but fails to parse is an error rather than silently
/// ignored.
pub fn load() -> Result<Config, CliError> {
    if config_path().exists() {
        Ok(load_config()?)
    } else {
        Ok(unified_config::load_config_or_default())
    }
}

/// Output settings: flag, then `[defaults]`, then built-in default.
pub fn render(global: &GlobalOpts, cfg: &Config) -> Render {
    let format = global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table);
    let color = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto);
    Render {
        format,
        color: output::should_color(color),
        quiet: global.quiet,
    }
}

/// `--use-db` or `defaults.use_db`.
pub fn use_db(global: &GlobalOpts, cfg: &Config) -> bool {
    global.use_db || cfg.defaults.use_db
}

/// Document store directory: `--db-path`, then the profile's, then the default.
pub fn store_dir(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    if let Some(ref path) = global.db_path {
        return path.clone();
    }
    let name = active_profile_name(global, cfg);
    match cfg.profiles.get(&name) {
        Some(profile) => profile.store_dir(&name),
        None => unified_config::default_store_dir().join(name),
    }
}

/// The profile to connect with: the configured one, or an ad-hoc profile
/// when only `--controller` was given.
fn active_profile(global: &GlobalOpts, cfg: &Config, name: &str) -> Result<Profile, CliError> {
    if let Some(profile) = cfg.profiles.get(name) {
        return Ok(profile.clone());
    }
    if global.controller.is_none() && global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: name.into(),
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }
    let controller = global.controller.clone().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    Ok(Profile {
        controller,
        site: "default".into(),
        username: None,
        password: None,
        insecure: None,
        ca_cert: None,
        timeout: None,
        db_path: None,
    })
}

/// Translate the active profile + global flags into a `Connection`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_connection(global: &GlobalOpts, cfg: &Config) -> Result<Connection, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = active_profile(global, cfg, &profile_name)?;

    // 1. Controller URL (flag > env > profile)
    let raw = global.controller.as_deref().unwrap_or(&profile.controller);
    let controller = unified_config::normalize_controller(raw)?;

    // 2. Site
    let site = global.site.clone().unwrap_or_else(|| profile.site.clone());

    // 3. Transport
    let mut transport = profile.transport(&cfg.defaults);
    if global.insecure {
        transport = transport.with_tls(TlsMode::DangerAcceptInvalid);
    }
    if let Some(secs) = global.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    // 4. Credentials
    let username = match global.username {
        Some(ref u) => u.clone(),
        None => unified_config::resolve_username(&profile, &profile_name).map_err(|_| {
            CliError::NoCredentials {
                profile: profile_name.clone(),
            }
        })?,
    };
    let password = match global.password {
        Some(ref p) => SecretString::from(p.clone()),
        None => match unified_config::resolve_password(&profile, &profile_name) {
            Some(secret) => secret,
            None => prompt_password(&profile_name, &username)?,
        },
    };

    Ok(Connection {
        profile_name,
        controller,
        site,
        username,
        password,
        transport,
    })
}

/// Last step of the password chain. Only prompts on a terminal.
fn prompt_password(profile_name: &str, username: &str) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    let password = rpassword::prompt_password(format!("Password for {username}: "))?;
    if password.is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    Ok(SecretString::from(password))
}
