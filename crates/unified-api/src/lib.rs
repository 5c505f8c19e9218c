// unified-api: Async Rust session client for the UniFi controller REST API

pub mod client;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod transport;

mod alarms;
mod auth;
mod devices;
mod events;
mod sites;
mod stations;
mod uap;
mod users;

pub use client::Client;
pub use error::{ApiError, Error};
pub use models::{
    Alarm, CommandResponse, DevMgrCmd, DevMgrCommand, Device, DeviceFilter, DeviceShort,
    DeviceUpdate, Event, GuestAuthorization, LoginStatus, Meta, Site, StaMgrCmd, StaMgrCommand,
    User,
};
pub use request::{ListOptions, Request, Response, ResponseMeta};
pub use reqwest::{Method, StatusCode};
pub use session::{DEFAULT_USER_AGENT, SessionCookies};
pub use transport::{TlsMode, TransportConfig};
