// Device endpoints (`stat/device`)
//
// Reads only. Commands that act on devices live in `uap.rs`.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Device, DeviceFilter, DeviceShort};
use crate::request::ListOptions;

const DEVICES_PATH: &str = "stat/device";

/// Reject blank MAC arguments before any request is sent.
///
/// The MAC is returned exactly as given.
pub(crate) fn require_mac(mac: &str) -> Result<&str, Error> {
    if mac.trim().is_empty() {
        return Err(Error::InvalidArgument {
            argument: "mac",
            reason: "cannot be empty".into(),
        });
    }
    Ok(mac)
}

impl Client {
    /// List all adopted and pending devices with full statistics.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self, options: Option<&ListOptions>) -> Result<Vec<Device>, Error> {
        debug!("listing devices");
        self.list_resource(DEVICES_PATH, options).await
    }

    /// `GET /api/s/{site}/stat/device/{id}`
    pub async fn get_device(&self, id: i64) -> Result<Device, Error> {
        debug!(id, "fetching device");
        self.get_resource("device", DEVICES_PATH, id).await
    }

    /// List devices of one type, projected to `DeviceShort`.
    ///
    /// Filtering happens client-side over `stat/device`.
    pub async fn list_devices_short(
        &self,
        filter: DeviceFilter,
        options: Option<&ListOptions>,
    ) -> Result<Vec<DeviceShort>, Error> {
        debug!(%filter, "listing devices (short)");
        let devices = self.list_devices(options).await?;
        Ok(devices
            .iter()
            .filter(|d| filter.matches(d))
            .map(DeviceShort::from)
            .collect())
    }

    /// Look up a device by MAC address.
    ///
    /// `GET /api/s/{site}/stat/device/{mac}`
    pub async fn get_device_by_mac(&self, mac: &str) -> Result<Device, Error> {
        let mac = require_mac(mac)?;
        debug!(mac, "fetching device by mac");
        self.first_of("device", &format!("{DEVICES_PATH}/{mac}"), mac.to_owned())
            .await
    }

    /// Management IP of the device with this MAC.
    pub async fn device_ip_from_mac(&self, mac: &str) -> Result<String, Error> {
        let device = self.get_device_by_mac(mac).await?;
        device
            .ip
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| Error::NotFound {
                resource: "device IP",
                identifier: device.mac,
            })
    }

    /// Controller `_id` of the device with this MAC.
    pub async fn device_id_from_mac(&self, mac: &str) -> Result<String, Error> {
        Ok(self.get_device_by_mac(mac).await?.id)
    }
}
