// Controller session state
//
// Holds the controller root URL, the site-scoped base URL, the user agent,
// and the two cookies the controller issues on login. Cookie state is an
// immutable value swapped atomically, so a `Client` shared across tasks
// never observes a half-updated session.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::trace;
use url::Url;

use crate::error::Error;

/// Name of the controller's session cookie.
pub const SESSION_COOKIE: &str = "unifises";
/// Name of the controller's CSRF token cookie.
pub const CSRF_COOKIE: &str = "csrf_token";

/// Default user agent: `unified/<version>`.
pub const DEFAULT_USER_AGENT: &str = concat!("unified/", env!("CARGO_PKG_VERSION"));

/// Snapshot of the session tokens issued by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub session: Option<String>,
    pub csrf: Option<String>,
}

impl SessionCookies {
    /// `true` once the controller has issued a session cookie.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Render the stored tokens as a `Cookie` header value.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [
            (SESSION_COOKIE, self.session.as_deref()),
            (CSRF_COOKIE, self.csrf.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
        .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Return a copy with whichever tokens appear in `cookies` replaced.
    ///
    /// An empty cookie value (the controller's way of expiring a cookie)
    /// clears the corresponding token.
    fn updated<'a>(&self, cookies: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut next = self.clone();
        for (name, value) in cookies {
            let slot = match name {
                SESSION_COOKIE => &mut next.session,
                CSRF_COOKIE => &mut next.csrf,
                _ => continue,
            };
            *slot = (!value.is_empty()).then(|| value.to_owned());
        }
        next
    }
}

pub(crate) struct Session {
    root: Url,
    site_base: Url,
    site: String,
    user_agent: String,
    cookies: ArcSwap<SessionCookies>,
}

impl Session {
    /// Build a session rooted at `controller` and scoped to `site`.
    ///
    /// The controller URL may carry a path prefix; resource paths resolve
    /// beneath it.
    pub(crate) fn new(controller: &Url, site: &str) -> Result<Self, Error> {
        if site.is_empty() {
            return Err(Error::InvalidArgument {
                argument: "site",
                reason: "cannot be empty".into(),
            });
        }

        let mut root = controller.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let site_base = root.join(&format!("api/s/{site}/"))?;

        Ok(Self {
            root,
            site_base,
            site: site.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            cookies: ArcSwap::from_pointee(SessionCookies::default()),
        })
    }

    pub(crate) fn site(&self) -> &str {
        &self.site
    }

    pub(crate) fn root(&self) -> &Url {
        &self.root
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Prefix the default user agent: `<ua>+unified/<version>`.
    pub(crate) fn set_user_agent(&mut self, ua: &str) {
        self.user_agent = format!("{ua}+{DEFAULT_USER_AGENT}");
    }

    /// Resolve a request path.
    ///
    /// Paths starting with `/` are controller-level (`/api/login`); all
    /// others are site-scoped (`stat/device` → `…/api/s/<site>/stat/device`).
    pub(crate) fn resolve(&self, path: &str) -> Result<Url, Error> {
        let url = match path.strip_prefix('/') {
            Some(absolute) => self.root.join(absolute)?,
            None => self.site_base.join(path)?,
        };
        Ok(url)
    }

    pub(crate) fn cookies(&self) -> Arc<SessionCookies> {
        self.cookies.load_full()
    }

    /// Fold any session cookies from a response into the stored state.
    pub(crate) fn refresh(&self, cookies: &[(&str, &str)]) {
        let relevant: Vec<(&str, &str)> = cookies
            .iter()
            .copied()
            .filter(|(name, _)| *name == SESSION_COOKIE || *name == CSRF_COOKIE)
            .collect();
        if relevant.is_empty() {
            return;
        }

        trace!(count = relevant.len(), "session cookies rotated");
        self.cookies
            .rcu(|current| current.updated(relevant.iter().copied()));
    }

    pub(crate) fn clear(&self) {
        self.cookies.store(Arc::new(SessionCookies::default()));
    }
}
