use thiserror::Error;

/// Errors raised while building a URL configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// `re_path()` pattern is not a valid regular expression
    #[error("invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
    /// `path()` pattern uses a converter that does not exist
    #[error("unknown path converter '{converter}' in route '{route}'")]
    UnknownConverter { route: String, converter: String },
    /// `path()` pattern has an unterminated `<...>` segment
    #[error("malformed route '{route}'")]
    MalformedRoute { route: String },
    /// Included URL module is not registered
    #[error("URL module not registered: {0}")]
    UnknownUrlConf(String),
}
