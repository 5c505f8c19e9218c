// Request descriptors and response metadata
//
// A `Request` is built up front and handed to `Client::execute*`; nothing
// touches the network until then.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;

use crate::error::Error;

/// Pagination for list endpoints. Zero fields are left off the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
}

impl ListOptions {
    pub fn query_pairs(self) -> Vec<(String, String)> {
        [("page", self.page), ("per_page", self.per_page)]
            .into_iter()
            .filter(|(_, value)| *value > 0)
            .map(|(key, value)| (key.to_owned(), value.to_string()))
            .collect()
    }
}

/// A single controller request.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) anonymous: bool,
}

impl Request {
    /// Start a request. Paths beginning with `/` are controller-level;
    /// everything else is relative to `/api/s/<site>/`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(body).map_err(Error::Encode)?);
        Ok(self)
    }

    /// Attach an already-encoded JSON body.
    pub fn raw_json(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append pagination parameters, if any.
    pub fn with_options(mut self, options: Option<&ListOptions>) -> Self {
        if let Some(options) = options {
            self.query.extend(options.query_pairs());
        }
        self
    }

    /// Allow sending without a session cookie (login and logout only).
    pub(crate) fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Status and headers of a completed response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl From<&reqwest::Response> for ResponseMeta {
    fn from(resp: &reqwest::Response) -> Self {
        Self {
            status: resp.status(),
            headers: resp.headers().clone(),
        }
    }
}

/// A decoded response body plus its metadata.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub body: T,
    pub meta: ResponseMeta,
}

impl<T> Response<T> {
    pub fn into_body(self) -> T {
        self.body
    }
}
