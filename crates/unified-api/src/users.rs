// Known-client endpoints (`list/user`)

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::User;
use crate::request::ListOptions;

const USERS_PATH: &str = "list/user";

impl Client {
    /// List every client the controller has seen.
    ///
    /// `GET /api/s/{site}/list/user`
    pub async fn list_users(&self, options: Option<&ListOptions>) -> Result<Vec<User>, Error> {
        debug!("listing users");
        self.list_resource(USERS_PATH, options).await
    }

    /// `GET /api/s/{site}/list/user/{id}`
    pub async fn get_user(&self, id: i64) -> Result<User, Error> {
        debug!(id, "fetching user");
        self.get_resource("user", USERS_PATH, id).await
    }
}
