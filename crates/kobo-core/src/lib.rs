//! URL routing table and runtime settings for the kobo form platform.
//!
//! - [`config`]: injected [`Settings`](config::Settings) loaded from files and the environment
//! - [`urls`]: the `path()`/`re_path()` pattern engine and resolver
//! - [`routes`]: the kobo route table
//! - [`dispatch`]: request dispatch with redirects and the staff-only admin login guard

pub mod config;
pub mod dispatch;
pub mod routes;
pub mod urls;

pub use config::Settings;
pub use dispatch::{Dispatcher, Request, Response, User};
pub use routes::{kobo_urlpatterns, AppRegistry};
pub use urls::{Resolution, ResolverMatch, RoutingError, UrlConf};
