//! Configuration storage and application paths.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_CONFIG, ENV_FORMAT, ENV_NO_COLOR, ENV_NO_COLOR_STD,
    ENV_PRETTY, ENV_SMS_URL, ENV_TIMEOUT, ENV_VERBOSE, ENV_VOICE_URL, ResolvedConfig,
};
pub use paths::AppPaths;
