// Controller session client
//
// Wraps `reqwest::Client` with site-scoped URL resolution, session cookie
// handling, and error decoding. Every endpoint module (alarms, devices,
// stations, etc.) is an inherent impl in its own file and funnels through
// the `execute*` methods here.

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Error};
use crate::models::{CommandResponse, DataEnvelope, Meta};
use crate::request::{ListOptions, Request, Response, ResponseMeta};
use crate::session::{Session, SessionCookies};
use crate::transport::TransportConfig;

const PREVIEW_CHARS: usize = 200;

/// Header carrying the CSRF token, required by UniFi OS consoles.
const CSRF_HEADER: &str = "X-CSRF-Token";

/// Error body shapes the controller uses on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    meta: Option<Meta>,
}

/// Authenticated client for one controller site.
///
/// Cheap to share behind an `Arc`: session state is swapped atomically and
/// every method takes `&self`.
pub struct Client {
    http: reqwest::Client,
    session: Session,
}

impl Client {
    /// Build a client with its own transport.
    ///
    /// `controller` is the controller root (e.g. `https://unifi:8443`), which
    /// may include a path prefix.
    pub fn new(controller: &Url, site: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_http(http, controller, site)
    }

    /// Build a client around a caller-supplied `reqwest::Client`.
    ///
    /// The supplied client should not carry its own cookie store; session
    /// cookies are managed here.
    pub fn with_http(http: reqwest::Client, controller: &Url, site: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            session: Session::new(controller, site)?,
        })
    }

    /// Identify the caller: the user agent becomes `<ua>+unified/<version>`.
    pub fn with_user_agent(mut self, ua: &str) -> Self {
        self.session.set_user_agent(ua);
        self
    }

    /// The current site identifier.
    pub fn site(&self) -> &str {
        self.session.site()
    }

    /// The controller root URL.
    pub fn base_url(&self) -> &Url {
        self.session.root()
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &str {
        self.session.user_agent()
    }

    /// Snapshot of the current session cookies.
    pub fn session_cookies(&self) -> Arc<SessionCookies> {
        self.session.cookies()
    }

    /// `true` while a session cookie is held.
    pub fn is_logged_in(&self) -> bool {
        self.session.cookies().has_session()
    }

    pub(crate) fn clear_session(&self) {
        self.session.clear();
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Execute a request and decode the JSON body into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<Response<T>, Error> {
        let resp = self.send(request).await?;
        let meta = ResponseMeta::from(&resp);
        let text = resp.text().await?;
        let body = decode(&text)?;
        Ok(Response { body, meta })
    }

    /// Execute a request and return the raw body.
    pub async fn execute_bytes(&self, request: Request) -> Result<Response<Bytes>, Error> {
        let resp = self.send(request).await?;
        let meta = ResponseMeta::from(&resp);
        let body = resp.bytes().await?;
        Ok(Response { body, meta })
    }

    /// Execute a request and stream the raw body into `writer` chunk by chunk.
    pub async fn execute_to_writer<W>(&self, request: Request, writer: &mut W) -> Result<ResponseMeta, Error>
    where
        W: Write + Send + ?Sized,
    {
        let mut resp = self.send(request).await?;
        let meta = ResponseMeta::from(&resp);
        while let Some(chunk) = resp.chunk().await? {
            writer.write_all(&chunk)?;
        }
        writer.flush()?;
        Ok(meta)
    }

    /// Send a request, refresh session cookies, and check the status.
    async fn send(&self, request: Request) -> Result<reqwest::Response, Error> {
        let url = self.session.resolve(&request.path)?;
        let cookies = self.session.cookies();
        if !request.anonymous && !cookies.has_session() {
            return Err(Error::NotLoggedIn);
        }

        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.session.user_agent());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        if let Some(cookie) = cookies.cookie_header() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(ref csrf) = cookies.csrf {
            builder = builder.header(CSRF_HEADER, csrf);
        }

        let resp = builder.send().await?;

        let issued: Vec<(String, String)> = resp
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();
        let issued: Vec<(&str, &str)> = issued
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        self.session.refresh(&issued);

        check_response(request.method, url, resp).await
    }

    // ── Generic resource helpers ─────────────────────────────────────

    /// GET a site-scoped collection and unwrap its `data` array.
    pub async fn list_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<&ListOptions>,
    ) -> Result<Vec<T>, Error> {
        let request = Request::get(path).with_options(options);
        let envelope: DataEnvelope<T> = self.execute(request).await?.into_body();
        envelope.into_data()
    }

    /// GET `path/{id}` and return the first record.
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        id: i64,
    ) -> Result<T, Error> {
        if id < 1 {
            return Err(Error::InvalidArgument {
                argument: "id",
                reason: "cannot be less than 1".into(),
            });
        }
        self.first_of(resource, &format!("{path}/{id}"), id.to_string())
            .await
    }

    /// GET `path` and return the first record, or `NotFound`.
    pub(crate) async fn first_of<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        identifier: String,
    ) -> Result<T, Error> {
        let items: Vec<T> = self.list_resource(path, None).await?;
        items.into_iter().next().ok_or(Error::NotFound {
            resource,
            identifier,
        })
    }

    /// Send a state-changing command and return the controller's envelope.
    pub async fn send_command<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<CommandResponse, Error> {
        let request = Request::new(method, path).json(body)?;
        Ok(self.execute(request).await?.into_body())
    }
}

/// Turn a non-2xx response into `Error::Api`.
async fn check_response(method: Method, url: Url, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let headers = resp.headers().clone();
    let body = resp.text().await.unwrap_or_default();
    let (message, request_id) = error_details(status, &body);

    Err(ApiError {
        method,
        url,
        status,
        message,
        request_id,
        headers,
    }
    .into())
}

fn error_details(status: StatusCode, body: &str) -> (String, String) {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let request_id = parsed
        .as_ref()
        .and_then(|b| b.request_id.clone())
        .unwrap_or_default();
    let message = parsed
        .and_then(|b| b.message.or_else(|| b.meta.and_then(|m| m.msg)))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("status {}", status.as_u16()));
    (message, request_id)
}

/// Decode a JSON body. An empty body decodes as `null`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| {
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        Error::Decode {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_details_prefers_message_then_meta() {
        let (msg, id) = error_details(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"invalid credentials","request_id":"abc"}"#,
        );
        assert_eq!((msg.as_str(), id.as_str()), ("invalid credentials", "abc"));

        let (msg, id) = error_details(
            StatusCode::BAD_REQUEST,
            r#"{"meta":{"rc":"error","msg":"api.err.Invalid"},"data":[]}"#,
        );
        assert_eq!((msg.as_str(), id.as_str()), ("api.err.Invalid", ""));

        let (msg, _) = error_details(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(msg, "status 502");
    }

    #[test]
    fn decode_reports_preview() {
        let err = decode::<Vec<u32>>("not json").unwrap_err();
        match err {
            Error::Decode { message, body } => {
                assert!(message.contains("not json"));
                assert_eq!(body, "not json");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
        assert_eq!(decode::<Option<u32>>("").unwrap(), None);
    }
}
