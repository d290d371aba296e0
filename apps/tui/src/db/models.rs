use sqlx::FromRow;
use tour_itinerary::{Language, MapScope};

/// One row of the `preferences` table.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub key: String,
    pub value: String,
    pub updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    Language,
    Scope,
}

impl PreferenceKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Language => "lang",
            Self::Scope => "scope",
        }
    }
}

/// Settings remembered between runs. Unknown or missing values stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub language: Option<Language>,
    pub scope: Option<MapScope>,
}
