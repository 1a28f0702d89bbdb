mod duration;
mod loader;
mod target;

pub use duration::{parse_duration, parse_keys};
pub use loader::{load_config, JblastorConfig, LoadedConfig, CONFIG_FILE_NAME};
pub use target::{
    parse_endpoint, Credentials, DispatchMode, RandomizeOptions, TargetConfig,
    TargetConfigBuilder, TargetOverrides, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT,
};
