//! Runtime settings.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{parse_env_bool, Settings};
