mod settings;

pub use settings::{build_app_config, load_app_config, AppConfig, ConfigError, DataRoot};
