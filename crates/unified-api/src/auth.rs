// Session login/logout
//
// `POST /api/login` issues the `unifises` and `csrf_token` cookies, which
// `Session` then attaches to every request. There is no implicit re-login:
// an expired session surfaces as an `Api` error with status 401.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{DataEnvelope, LoginStatus};
use crate::request::Request;

const LOGIN_PATH: &str = "/api/login";
const LOGOUT_PATH: &str = "/api/logoff";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl Client {
    /// Authenticate with username/password.
    ///
    /// `POST /api/login` with `{"username": ..., "password": ...}`. Any
    /// previous session is dropped first, so the stored cookies afterwards
    /// are exactly the ones this login issued. Fails with
    /// `Error::Authentication` if the controller answers 2xx without issuing
    /// both `unifises` and `csrf_token`.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginStatus, Error> {
        debug!(username, site = self.site(), "logging in");
        self.clear_session();

        let request = Request::post(LOGIN_PATH)
            .json(&Credentials {
                username,
                password: password.expose_secret(),
            })?
            .anonymous();
        let envelope: Option<DataEnvelope<Value>> = self.execute(request).await?.into_body();

        let cookies = self.session_cookies();
        let missing = match (cookies.has_session(), cookies.csrf.is_some()) {
            (true, true) => None,
            (false, _) => Some("controller did not issue a session cookie"),
            (true, false) => Some("controller did not issue a CSRF token"),
        };
        if let Some(message) = missing {
            self.clear_session();
            return Err(Error::Authentication {
                message: message.into(),
            });
        }

        let meta = envelope.and_then(|e| e.meta);
        let status = meta
            .as_ref()
            .map(|m| m.rc.clone())
            .filter(|rc| !rc.is_empty())
            .unwrap_or_else(|| "ok".into());

        debug!(status = %status, "login successful");
        Ok(LoginStatus {
            username: username.to_owned(),
            status,
            status_message: meta.and_then(|m| m.msg),
        })
    }

    /// End the current session.
    ///
    /// `POST /api/logoff`. On success both session cookies are cleared; a
    /// failed logout leaves the session untouched.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.execute_bytes(Request::post(LOGOUT_PATH).anonymous())
            .await?;
        self.clear_session();
        debug!("logout complete");
        Ok(())
    }
}
