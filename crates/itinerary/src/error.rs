use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("itinerary document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("translation table for {language} is not a flat JSON object: {source}")]
    Translations {
        language: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A fetch that never reached the server (DNS, connection refused, I/O).
///
/// "Not found" is not an error: fetchers report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failure for {path}: {reason}")]
pub struct FetchError {
    pub path: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
