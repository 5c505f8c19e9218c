// Access point commands
//
// LED locate and restart go through the device manager (`cmd/devmgr`);
// enable/disable and rename update the device record (`rest/device/{id}`),
// which needs the controller id resolved from the MAC first.

use reqwest::Method;
use tracing::debug;

use crate::client::Client;
use crate::devices::require_mac;
use crate::error::Error;
use crate::models::{CommandResponse, DevMgrCmd, DevMgrCommand, DeviceUpdate};

const DEVMGR_PATH: &str = "cmd/devmgr";
const REST_DEVICE_PATH: &str = "rest/device";

impl Client {
    /// Start or stop flashing an AP's LED.
    ///
    /// `POST /api/s/{site}/cmd/devmgr` with `{"cmd": "set-locate"|"unset-locate", "mac": "..."}`
    pub async fn set_locate(&self, mac: &str, enabled: bool) -> Result<CommandResponse, Error> {
        let cmd = if enabled {
            DevMgrCmd::SetLocate
        } else {
            DevMgrCmd::UnsetLocate
        };
        self.devmgr(cmd, mac).await
    }

    /// Whether the AP's locate LED is currently flashing.
    pub async fn is_locating(&self, mac: &str) -> Result<bool, Error> {
        Ok(self.get_device_by_mac(mac).await?.locating)
    }

    /// Reboot an AP.
    ///
    /// `POST /api/s/{site}/cmd/devmgr` with `{"cmd": "restart", "mac": "..."}`
    pub async fn restart_ap(&self, mac: &str) -> Result<CommandResponse, Error> {
        self.devmgr(DevMgrCmd::Restart, mac).await
    }

    /// Disable (or re-enable) an AP.
    ///
    /// `PUT /api/s/{site}/rest/device/{id}` with `{"disabled": true|false}`
    pub async fn disable_ap(&self, mac: &str, disabled: bool) -> Result<CommandResponse, Error> {
        debug!(mac, disabled, "updating AP state");
        self.update_device(
            mac,
            &DeviceUpdate {
                disabled: Some(disabled),
                ..DeviceUpdate::default()
            },
        )
        .await
    }

    /// Set an AP's display name.
    ///
    /// `PUT /api/s/{site}/rest/device/{id}` with `{"name": "..."}`
    pub async fn rename_ap(&self, mac: &str, name: &str) -> Result<CommandResponse, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument {
                argument: "name",
                reason: "cannot be empty".into(),
            });
        }
        debug!(mac, name, "renaming AP");
        self.update_device(
            mac,
            &DeviceUpdate {
                name: Some(name.to_owned()),
                ..DeviceUpdate::default()
            },
        )
        .await
    }

    async fn devmgr(&self, cmd: DevMgrCmd, mac: &str) -> Result<CommandResponse, Error> {
        let mac = require_mac(mac)?;
        debug!(mac, %cmd, "sending device manager command");
        let body = DevMgrCommand {
            cmd,
            mac: mac.to_owned(),
        };
        self.send_command(Method::POST, DEVMGR_PATH, &body).await
    }

    async fn update_device(&self, mac: &str, update: &DeviceUpdate) -> Result<CommandResponse, Error> {
        let id = self.device_id_from_mac(mac).await?;
        self.send_command(Method::PUT, &format!("{REST_DEVICE_PATH}/{id}"), update)
            .await
    }
}
