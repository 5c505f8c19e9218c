// Controller response and command types
//
// Lists come back as `{ "data": [...] }`, commands as
// `{ "data": [...], "meta": { "rc": "ok" } }`. Fields use
// `#[serde(default)]` liberally because the controller is inconsistent
// about field presence across firmware versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::Error;

// ── Envelopes ────────────────────────────────────────────────────────

/// Response envelope shared by list and command endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<T> DataEnvelope<T> {
    /// Unwrap `data`, refusing envelopes whose `meta.rc` is present and not `"ok"`.
    pub fn into_data(self) -> Result<Vec<T>, Error> {
        match self.meta {
            Some(meta) if !meta.rc.is_empty() && !meta.is_ok() => Err(Error::Rejected {
                message: meta.msg.unwrap_or_else(|| format!("rc={}", meta.rc)),
            }),
            _ => Ok(self.data),
        }
    }
}

/// Envelope metadata. `rc == "ok"` means success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub rc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// Result of a state-changing command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: Meta,
}

impl CommandResponse {
    pub fn is_ok(&self) -> bool {
        self.meta.is_ok()
    }
}

/// Outcome of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginStatus {
    pub username: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

// ── Alarm ────────────────────────────────────────────────────────────

/// Alarm from `list/alarm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub essid: Option<String>,
    #[serde(default)]
    pub handled_admin_id: Option<String>,
    #[serde(default)]
    pub handled_time: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default, rename = "msg")]
    pub message: Option<String>,
    #[serde(default)]
    pub occurs: Option<i64>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Event ────────────────────────────────────────────────────────────

/// Event from `list/event`.
///
/// Which of the optional fields appear depends on `key`
/// (e.g. `EVT_WU_Roam` carries `ap_from`/`ap_to`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, rename = "msg")]
    pub message: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub ap: Option<String>,
    #[serde(default)]
    pub ap_name: Option<String>,
    #[serde(default)]
    pub ap_from: Option<String>,
    #[serde(default)]
    pub ap_to: Option<String>,
    #[serde(default, rename = "sw")]
    pub switch: Option<String>,
    #[serde(default, rename = "sw_name")]
    pub switch_name: Option<String>,
    #[serde(default)]
    pub gw: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Full device object from `stat/device`.
///
/// The controller returns well over a hundred fields per device. The
/// commonly needed ones are modelled; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub overheating: bool,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub num_sta: Option<i32>,
    #[serde(default, rename = "cfgversion")]
    pub config_version: Option<String>,
    #[serde(default)]
    pub led_override: Option<String>,
    #[serde(default)]
    pub inform_url: Option<String>,
    #[serde(default)]
    pub config_network: Option<ConfigNetwork>,
    #[serde(default)]
    pub ethernet_table: Vec<EthernetEntry>,
    #[serde(default)]
    pub port_table: Vec<PortEntry>,
    #[serde(default)]
    pub downlink_table: Vec<DownlinkEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Human label: name when set, MAC otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.mac)
    }
}

/// Management network settings of a device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigNetwork {
    #[serde(default, rename = "type")]
    pub network_type: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub dns1: Option<String>,
    #[serde(default)]
    pub dns2: Option<String>,
    #[serde(default, rename = "dnssuffix")]
    pub dns_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthernetEntry {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub num_port: Option<u32>,
}

/// One switch or gateway port from `port_table`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortEntry {
    #[serde(default)]
    pub port_idx: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub is_uplink: bool,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub full_duplex: bool,
    #[serde(default)]
    pub poe_enable: bool,
    #[serde(default)]
    pub poe_mode: Option<String>,
    #[serde(default)]
    pub rx_bytes: Option<i64>,
    #[serde(default)]
    pub tx_bytes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownlinkEntry {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub port_idx: Option<u32>,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub full_duplex: bool,
}

/// Compact device projection used by `list_devices_short`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceShort {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub mac: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub ip: Option<String>,
    pub serial: Option<String>,
    pub site_id: Option<String>,
    pub version: Option<String>,
    pub adopted: bool,
}

impl From<&Device> for DeviceShort {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            device_type: d.device_type.clone(),
            mac: d.mac.clone(),
            name: d.name.clone(),
            model: d.model.clone(),
            ip: d.ip.clone(),
            serial: d.serial.clone(),
            site_id: d.site_id.clone(),
            version: d.version.clone(),
            adopted: d.adopted,
        }
    }
}

/// Device type filter for `list_devices_short`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DeviceFilter {
    #[default]
    All,
    /// Access points.
    Uap,
    /// Security gateways.
    Ugw,
    /// Switches.
    Usw,
}

impl DeviceFilter {
    pub fn matches(self, device: &Device) -> bool {
        match self {
            Self::All => true,
            other => device.device_type == other.to_string(),
        }
    }
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site from `/v1/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: String,
    /// Short identifier used in `/api/s/{name}/` URLs.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub attr_hidden_id: Option<String>,
    #[serde(default)]
    pub attr_no_delete: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── User ─────────────────────────────────────────────────────────────

/// Known client record from `list/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub is_guest: bool,
    #[serde(default)]
    pub is_wired: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub first_seen: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Commands ─────────────────────────────────────────────────────────

/// Device manager commands (`cmd/devmgr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DevMgrCmd {
    SetLocate,
    UnsetLocate,
    Restart,
}

/// Body for `POST cmd/devmgr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevMgrCommand {
    pub cmd: DevMgrCmd,
    pub mac: String,
}

/// Station manager commands (`cmd/stamgr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StaMgrCmd {
    BlockSta,
    UnblockSta,
    AuthorizeGuest,
    UnauthorizeGuest,
}

/// Body for `POST cmd/stamgr`. Guest limits are only sent when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaMgrCommand {
    pub cmd: StaMgrCmd,
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ap_mac: Option<String>,
}

impl StaMgrCommand {
    pub fn new(cmd: StaMgrCmd, mac: impl Into<String>) -> Self {
        Self {
            cmd,
            mac: mac.into(),
            minutes: None,
            up: None,
            down: None,
            bytes: None,
            ap_mac: None,
        }
    }
}

/// Guest authorization request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestAuthorization {
    pub mac: String,
    /// Authorization lifetime in minutes.
    pub minutes: Option<u32>,
    /// Upload limit in kbps.
    pub up: Option<u32>,
    /// Download limit in kbps.
    pub down: Option<u32>,
    /// Transfer quota in MB.
    pub bytes: Option<u64>,
    /// AP the guest is connected to.
    pub ap_mac: Option<String>,
}

impl From<GuestAuthorization> for StaMgrCommand {
    fn from(auth: GuestAuthorization) -> Self {
        Self {
            cmd: StaMgrCmd::AuthorizeGuest,
            mac: auth.mac,
            minutes: auth.minutes,
            up: auth.up,
            down: auth.down,
            bytes: auth.bytes,
            ap_mac: auth.ap_mac,
        }
    }
}

/// Body for `PUT rest/device/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
