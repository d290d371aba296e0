use std::collections::HashMap;

use crate::error::ItineraryError;

const ZH_CN_TABLE: &str = include_str!("../i18n/zh-CN.json");
const EN_TABLE: &str = include_str!("../i18n/en.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    ZhCn,
    En,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::ZhCn, Self::En];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::En => "en",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zh-cn" | "zh" | "cn" => Some(Self::ZhCn),
            "en" | "en-us" | "en-gb" => Some(Self::En),
            _ => None,
        }
    }

    /// The other language; there are only two.
    pub const fn toggled(self) -> Self {
        match self {
            Self::ZhCn => Self::En,
            Self::En => Self::ZhCn,
        }
    }

    const fn bundled_table(self) -> &'static str {
        match self {
            Self::ZhCn => ZH_CN_TABLE,
            Self::En => EN_TABLE,
        }
    }
}

type Table = HashMap<String, String>;

/// Key-to-string lookup with a default-language fallback.
///
/// Lookups never fail: a key missing from both the active and the default
/// table is returned as is.
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    table: Table,
    fallback: Table,
}

impl Translator {
    /// Translator backed by the tables shipped with the crate.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            table: bundled(language),
            fallback: bundled(Language::default()),
        }
    }

    /// Translator whose active table comes from `json`, e.g. an override
    /// file next to the data.
    pub fn from_json(language: Language, json: &str) -> Result<Self, ItineraryError> {
        let table = parse_table(json).map_err(|source| ItineraryError::Translations {
            language: language.as_str().to_string(),
            source,
        })?;
        Ok(Self {
            language,
            table,
            fallback: bundled(Language::default()),
        })
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.table
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map_or(key, String::as_str)
    }

    /// Looks up `key` and replaces each `{name}` placeholder with its value.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

fn parse_table(json: &str) -> Result<Table, serde_json::Error> {
    serde_json::from_str(json)
}

fn bundled(language: Language) -> Table {
    parse_table(language.bundled_table()).unwrap_or_default()
}
