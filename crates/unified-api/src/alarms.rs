// Alarm endpoints (`list/alarm`)

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::Alarm;
use crate::request::ListOptions;

const ALARMS_PATH: &str = "list/alarm";

impl Client {
    /// List alarms.
    ///
    /// `GET /api/s/{site}/list/alarm`
    pub async fn list_alarms(&self, options: Option<&ListOptions>) -> Result<Vec<Alarm>, Error> {
        debug!("listing alarms");
        self.list_resource(ALARMS_PATH, options).await
    }

    /// Fetch one alarm.
    ///
    /// `GET /api/s/{site}/list/alarm/{id}`; `id` must be at least 1.
    pub async fn get_alarm(&self, id: i64) -> Result<Alarm, Error> {
        debug!(id, "fetching alarm");
        self.get_resource("alarm", ALARMS_PATH, id).await
    }
}
