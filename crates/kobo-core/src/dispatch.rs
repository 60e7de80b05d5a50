//! Request dispatch over a resolved [`UrlConf`].

use crate::urls::{Guard, RedirectView, Resolution, ResolvedTarget, UrlConf, View};
use std::collections::HashMap;

/// Requesting user, as far as routing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct User {
    pub is_authenticated: bool,
    pub is_active: bool,
    pub is_staff: bool,
}

impl User {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn staff() -> Self {
        Self {
            is_authenticated: true,
            is_active: true,
            is_staff: true,
        }
    }
}

/// Incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request path, with or without leading slash
    pub path: String,
    /// Raw query string without `?`
    pub query: Option<String>,
    pub user: User,
}

impl Request {
    pub fn new(path: impl Into<String>, user: User) -> Self {
        Self {
            path: path.into(),
            query: None,
            user,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Path plus query string.
    pub fn full_path(&self) -> String {
        match self.query.as_deref() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }
}

/// Dispatch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A view would run with these captures
    View {
        name: String,
        kwargs: HashMap<String, String>,
    },
    Redirect { status: u16, location: String },
    Gone,
    NotFound,
}

impl Response {
    pub fn status(&self) -> u16 {
        match self {
            Response::View { .. } => 200,
            Response::Redirect { status, .. } => *status,
            Response::Gone => 410,
            Response::NotFound => 404,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Response::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Resolves requests against a URL conf and applies redirects and guards.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    urlconf: UrlConf,
}

impl Dispatcher {
    pub fn new(urlconf: UrlConf) -> Self {
        Self { urlconf }
    }

    pub fn urlconf(&self) -> &UrlConf {
        &self.urlconf
    }

    pub fn dispatch(&self, request: &Request) -> Response {
        let m = match self.urlconf.resolve(&request.path) {
            Resolution::Match(m) => m,
            Resolution::NotFound { .. } => {
                tracing::debug!(path = %request.path, status = 404, "dispatched");
                return Response::NotFound;
            }
        };

        let response = match m.target {
            ResolvedTarget::Redirect(redirect) => redirect_response(&redirect),
            ResolvedTarget::View(view) => view_response(view, m.kwargs, request),
        };
        tracing::debug!(
            path = %request.path,
            route = %m.route,
            status = response.status(),
            "dispatched"
        );
        response
    }
}

fn redirect_response(redirect: &RedirectView) -> Response {
    match &redirect.url {
        Some(url) => Response::Redirect {
            status: if redirect.permanent { 301 } else { 302 },
            location: url.clone(),
        },
        None => {
            tracing::warn!("redirect has no target url");
            Response::Gone
        }
    }
}

fn view_response(view: View, kwargs: HashMap<String, String>, request: &Request) -> Response {
    match &view.guard {
        Some(Guard::StaffMemberRequired { login_url })
            if !(request.user.is_active && request.user.is_staff) =>
        {
            Response::Redirect {
                status: 302,
                location: redirect_to_login(login_url, &request.full_path()),
            }
        }
        _ => Response::View {
            name: view.name,
            kwargs,
        },
    }
}

/// `login_url` with the original location in `next`.
pub fn redirect_to_login(login_url: &str, next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{login_url}{separator}next={next}")
}
