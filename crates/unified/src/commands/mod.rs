//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod alarms;
pub mod ap;
pub mod api;
pub mod clients;
pub mod config_cmd;
pub mod db;
pub mod devices;
pub mod events;
pub mod sites;
pub mod users;
pub mod util;

use serde::Serialize;
use tracing::{debug, info, warn};

use unified_api::Client;
use unified_store::DocumentStore;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::Render;

// ── Store collections ───────────────────────────────────────────────

pub const ALARMS: &str = "Alarms";
pub const EVENTS: &str = "Events";
pub const DEVICES: &str = "Devices";
pub const SITES: &str = "Sites";
pub const USERS: &str = "Users";

/// Field every mirrored collection is keyed and indexed on.
const KEY_FIELD: &str = "_id";

/// Shared state for controller-bound handlers.
pub struct Context {
    pub client: Client,
    pub store: Option<DocumentStore>,
    pub render: Render,
    pub yes: bool,
}

impl Context {
    /// Upsert list results into the document store when `--use-db` is on.
    pub fn mirror<T: Serialize>(
        &self,
        collection: &str,
        records: &[T],
        key_fn: impl Fn(&T) -> String,
    ) -> Result<(), CliError> {
        let Some(ref store) = self.store else {
            return Ok(());
        };
        let report = store.upsert_by_key(collection, KEY_FIELD, records, key_fn)?;
        info!(
            collection,
            inserted = report.inserted,
            existing = report.existing,
            "mirrored into store"
        );
        Ok(())
    }
}

/// Log in, run one controller-bound command, log out.
///
/// Logout is attempted even when the command fails; its own failure is
/// only logged. The store is flushed after a successful command.
pub async fn run_connected(
    cmd: Command,
    global: &GlobalOpts,
    cfg: &Config,
    render: Render,
) -> Result<(), CliError> {
    let conn = config::resolve_connection(global, cfg)?;
    let client = Client::new(&conn.controller, &conn.site, &conn.transport)?;

    let store = if config::use_db(global, cfg) {
        let dir = config::store_dir(global, cfg);
        debug!(path = %dir.display(), "opening document store");
        Some(DocumentStore::open(dir)?)
    } else {
        None
    };

    let ctx = Context {
        client,
        store,
        render,
        yes: global.yes,
    };

    debug!(
        profile = %conn.profile_name,
        controller = %conn.controller,
        site = %conn.site,
        "connecting"
    );
    let status = ctx.client.login(&conn.username, &conn.password).await?;
    debug!(username = %status.username, status = %status.status, "logged in");

    let result = dispatch(cmd, &ctx).await;

    if let Err(e) = ctx.client.logout().await {
        warn!(error = %e, "logout failed");
    }
    result?;

    if let Some(ref store) = ctx.store {
        store.flush()?;
    }
    Ok(())
}

/// Dispatch a controller-bound command to the appropriate handler.
async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    debug!(command = ?cmd, "dispatching command");
    match cmd {
        Command::Alarms(args) => alarms::handle(ctx, args).await,
        Command::Events(args) => events::handle(ctx, args).await,
        Command::Devices(args) => devices::handle(ctx, args).await,
        Command::Ap(args) => ap::handle(ctx, args).await,
        Command::Clients(args) => clients::handle(ctx, args).await,
        Command::Users(args) => users::handle(ctx, args).await,
        Command::Sites(args) => sites::handle(ctx, args).await,
        Command::Api(args) => api::handle(ctx, args).await,
        // Db, Config and Completions are handled before connecting
        Command::Db(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
