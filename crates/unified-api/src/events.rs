// Event endpoints (`list/event`)

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::Event;
use crate::request::ListOptions;

const EVENTS_PATH: &str = "list/event";

impl Client {
    /// List events, newest first as the controller returns them.
    ///
    /// `GET /api/s/{site}/list/event`
    pub async fn list_events(&self, options: Option<&ListOptions>) -> Result<Vec<Event>, Error> {
        debug!("listing events");
        self.list_resource(EVENTS_PATH, options).await
    }

    /// `GET /api/s/{site}/list/event/{id}`
    pub async fn get_event(&self, id: i64) -> Result<Event, Error> {
        debug!(id, "fetching event");
        self.get_resource("event", EVENTS_PATH, id).await
    }
}
