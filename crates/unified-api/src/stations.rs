// Client (station) commands via `cmd/stamgr`

use reqwest::Method;
use tracing::debug;

use crate::client::Client;
use crate::devices::require_mac;
use crate::error::Error;
use crate::models::{CommandResponse, GuestAuthorization, StaMgrCmd, StaMgrCommand};

const STAMGR_PATH: &str = "cmd/stamgr";

impl Client {
    /// Block or unblock a client by MAC.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta"|"unblock-sta", "mac": "..."}`
    pub async fn block_client(&self, mac: &str, blocked: bool) -> Result<CommandResponse, Error> {
        let cmd = if blocked {
            StaMgrCmd::BlockSta
        } else {
            StaMgrCmd::UnblockSta
        };
        self.stamgr(StaMgrCommand::new(cmd, require_mac(mac)?.to_owned()))
            .await
    }

    /// Authorize a guest on the hotspot portal.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "authorize-guest", "mac": "...", ...}`;
    /// unset limits are omitted from the body.
    pub async fn authorize_guest(&self, auth: GuestAuthorization) -> Result<CommandResponse, Error> {
        require_mac(&auth.mac)?;
        self.stamgr(StaMgrCommand::from(auth)).await
    }

    /// Revoke a guest authorization.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unauthorize-guest", "mac": "..."}`
    pub async fn unauthorize_guest(&self, mac: &str) -> Result<CommandResponse, Error> {
        self.stamgr(StaMgrCommand::new(
            StaMgrCmd::UnauthorizeGuest,
            require_mac(mac)?.to_owned(),
        ))
        .await
    }

    async fn stamgr(&self, body: StaMgrCommand) -> Result<CommandResponse, Error> {
        debug!(mac = %body.mac, cmd = %body.cmd, "sending station manager command");
        self.send_command(Method::POST, STAMGR_PATH, &body).await
    }
}
