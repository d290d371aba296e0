use thiserror::Error;
use tour_itinerary::{FetchError, ItineraryError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("itinerary not found at {path}")]
    MissingItinerary { path: String },

    #[error(transparent)]
    Itinerary(#[from] ItineraryError),
}

impl ContentError {
    /// Collapses the error into the transport failure the shared resolvers
    /// understand.
    pub fn into_fetch_error(self, path: &str) -> FetchError {
        FetchError::new(path, self.to_string())
    }
}
