//! URL pattern engine.
//!
//! [`path`] builds anchored route patterns with `<converter:name>` segments,
//! [`re_path`] builds regex patterns that are *searched* in the remaining
//! path. A [`UrlConf`] is evaluated top to bottom and the first match wins.

mod conf;
mod error;
mod pattern;

pub use conf::{
    Guard, RedirectView, Resolution, ResolvedTarget, ResolverMatch, Target, UrlConf, UrlPattern,
    View,
};
pub use error::RoutingError;
pub use pattern::{path, re_path, Pattern, PatternMatch};
