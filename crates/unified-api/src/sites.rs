// Site endpoints
//
// Site listing is controller-scoped, using `/v1/sites` rather than the
// usual `/api/s/{site}/...` pattern.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::Site;
use crate::request::ListOptions;

const SITES_PATH: &str = "/v1/sites";

impl Client {
    /// List all sites visible to the authenticated user.
    ///
    /// `GET /v1/sites`
    pub async fn list_sites(&self, options: Option<&ListOptions>) -> Result<Vec<Site>, Error> {
        debug!("listing sites");
        self.list_resource(SITES_PATH, options).await
    }

    /// `GET /v1/sites/{id}`
    pub async fn get_site(&self, id: i64) -> Result<Site, Error> {
        debug!(id, "fetching site");
        self.get_resource("site", SITES_PATH, id).await
    }
}
