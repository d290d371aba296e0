use dotenv::dotenv;
use std::env::{self, VarError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tour_itinerary::Language;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Where the itinerary and its documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRoot {
    Dir(PathBuf),
    Http(String),
}

impl DataRoot {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Http(raw.trim_end_matches('/').to_string())
        } else {
            Self::Dir(PathBuf::from(raw))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Dir(path) => path.display().to_string(),
            Self::Http(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_root: DataRoot,
    /// Explicit language; `None` defers to the stored preference.
    pub language: Option<Language>,
    pub database_name: String,
    pub log_file: PathBuf,
    pub http_timeout_secs: u64,
    pub debug: bool,
}

impl AppConfig {
    /// SQLx connection URL of the preferences store.
    pub fn database_url(&self) -> String {
        let path = Path::new(&self.database_name);
        let clean = self.database_name.trim_start_matches('/');
        if path.is_absolute() {
            format!("sqlite:///{clean}")
        } else {
            format!("sqlite://{clean}")
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Loads `.env` and builds the configuration from the process environment.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    build_app_config(|key| env::var(key))
}

/// Builds the configuration from an environment lookup, so it can be tested
/// without touching the process environment.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let language = match lookup("TOUR_LANG") {
        Ok(raw) if !raw.trim().is_empty() => {
            Some(Language::parse(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: "TOUR_LANG".to_string(),
                reason: format!("unsupported language {raw:?}, expected zh-CN or en"),
            })?)
        }
        _ => None,
    };

    let http_timeout_secs = or_default("TOUR_HTTP_TIMEOUT_SECS", "10")
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "TOUR_HTTP_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?;

    let debug = lookup("DEBUG").is_ok_and(|value| {
        let value = value.trim();
        !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
    });

    Ok(AppConfig {
        data_root: DataRoot::parse(&or_default("TOUR_DATA_ROOT", "./data")),
        language,
        database_name: or_default("DATABASE_NAME", "tour_map.db"),
        log_file: PathBuf::from(or_default("TOUR_LOG_FILE", "tour_map.log")),
        http_timeout_secs,
        debug,
    })
}
