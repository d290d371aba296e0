use std::path::PathBuf;
use std::time::Duration;

use tour_itinerary::content::ITINERARY_PATH;
use tour_itinerary::{parse_itinerary, FetchError, Language, TourStop, Translator};
use tracing::{debug, warn};

use crate::config::{AppConfig, DataRoot};
use crate::content::ContentError;

/// Reads documents relative to the data root, either from disk or over HTTP.
///
/// A missing document is `Ok(None)`. Only transport problems are errors.
#[derive(Debug, Clone)]
pub enum ContentClient {
    Dir(PathBuf),
    Http { client: reqwest::Client, base: String },
}

impl ContentClient {
    pub fn new(root: &DataRoot, timeout_secs: u64) -> Result<Self, ContentError> {
        match root {
            DataRoot::Dir(path) => Ok(Self::Dir(path.clone())),
            DataRoot::Http(base) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(timeout_secs))
                    .user_agent(concat!("tour-map/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|source| ContentError::Http {
                        url: base.clone(),
                        source,
                    })?;
                Ok(Self::Http {
                    client,
                    base: base.clone(),
                })
            }
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ContentError> {
        Self::new(&config.data_root, config.http_timeout_secs)
    }

    /// The data root, for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Dir(root) => root.display().to_string(),
            Self::Http { base, .. } => base.clone(),
        }
    }

    pub async fn fetch(&self, path: &str) -> Result<Option<String>, ContentError> {
        match self {
            Self::Dir(root) => {
                let full = root.join(path);
                match tokio::fs::read_to_string(&full).await {
                    Ok(body) => Ok(Some(body)),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                        debug!(path = %full.display(), "document not found");
                        Ok(None)
                    }
                    Err(source) => Err(ContentError::Io {
                        path: full.display().to_string(),
                        source,
                    }),
                }
            }
            Self::Http { client, base } => {
                let url = format!("{base}/{}", path.trim_start_matches('/'));
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|source| ContentError::Http {
                        url: url.clone(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    if status != reqwest::StatusCode::NOT_FOUND {
                        warn!(%url, status = status.as_u16(), "treating error status as missing document");
                    }
                    return Ok(None);
                }

                let body = response
                    .text()
                    .await
                    .map_err(|source| ContentError::Http { url, source })?;
                Ok(Some(body))
            }
        }
    }

    /// Owned variant of [`Self::fetch`] for the shared resolvers and for
    /// spawned tasks.
    pub async fn fetch_owned(self, path: String) -> Result<Option<String>, FetchError> {
        self.fetch(&path)
            .await
            .map_err(|err| err.into_fetch_error(&path))
    }

    pub async fn load_itinerary(&self) -> Result<Vec<TourStop>, ContentError> {
        let body = self
            .fetch(ITINERARY_PATH)
            .await?
            .ok_or_else(|| ContentError::MissingItinerary {
                path: ITINERARY_PATH.to_string(),
            })?;
        Ok(parse_itinerary(&body)?)
    }

    /// Translator for `language`, with overrides from `i18n/{lang}.json` when
    /// the data root provides them. Never fails.
    pub async fn load_translator(&self, language: Language) -> Translator {
        let path = format!("i18n/{}.json", language.as_str());
        match self.fetch(&path).await {
            Ok(Some(json)) => Translator::from_json(language, &json).unwrap_or_else(|err| {
                warn!(%path, error = %err, "ignoring malformed translation override");
                Translator::new(language)
            }),
            Ok(None) => Translator::new(language),
            Err(err) => {
                warn!(%path, error = %err, "translation override unavailable");
                Translator::new(language)
            }
        }
    }
}
