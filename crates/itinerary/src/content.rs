//! Naming and resolution of the documents that live next to the itinerary:
//! per-stop setlists, the markdown tabs and lyric sheets.
//!
//! Fetching itself is left to the caller. Resolvers take a fetcher closure
//! returning `Ok(Some(body))` on success, `Ok(None)` when the document does
//! not exist and `Err` when the transport failed.

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::dates::parse_date_range;
use crate::error::FetchError;
use crate::markdown::strip_tags;
use crate::stop::{TourStop, CITY_UNANNOUNCED_MARKER};

pub const ITINERARY_PATH: &str = "itinerary.json";
const SETLIST_DIR: &str = "setlist";
const LYRICS_DIR: &str = "lyrics";

static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<span\b([^>]*)>(.*?)</span>").expect("valid span regex"));
static LYRIC_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class\s*=\s*["'][^"']*\blyric-trigger\b[^"']*["']"#)
        .expect("valid class regex")
});
static LYRIC_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)data-lyric-file\s*=\s*["']([^"']+)["']"#).expect("valid file regex")
});

/// Lowercases `raw` and replaces every character outside `[a-z0-9_-]`
/// with `_`.
pub fn normalize_file_stem(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Position of `stops[index]` among the stops whose date parses. Unnamed
/// setlists are numbered this way. `None` when the stop has no date.
pub fn dated_position(stops: &[TourStop], index: usize) -> Option<usize> {
    let stop = stops.get(index)?;
    parse_date_range(&stop.date_text)?;
    Some(
        stops[..index]
            .iter()
            .filter(|earlier| parse_date_range(&earlier.date_text).is_some())
            .count(),
    )
}

/// File stem of a stop's setlist. `dated_index` comes from
/// [`dated_position`] and only matters when no setlist name is published.
pub fn setlist_file_stem(stop: &TourStop, dated_index: usize) -> String {
    let name = stop.setlist_name.trim();
    if !name.is_empty() {
        return normalize_file_stem(name);
    }
    let city: String = stop
        .city
        .replace(CITY_UNANNOUNCED_MARKER, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    normalize_file_stem(&format!("_0{}_{city}", dated_index + 1))
}

/// Whether a missing setlist should be explained as "not announced yet"
/// rather than "not published yet".
pub fn is_setlist_unannounced(stop: &TourStop) -> bool {
    stop.city.contains(CITY_UNANNOUNCED_MARKER)
        || stop.setlist_name.trim().is_empty()
        || stop.announced == Some(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Html,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistCandidate {
    pub path: String,
    pub format: DocumentFormat,
}

/// Paths tried for a setlist, in order: the pre-rendered page first.
pub fn setlist_candidates(stem: &str) -> [SetlistCandidate; 2] {
    [
        SetlistCandidate {
            path: format!("{SETLIST_DIR}/{stem}.html"),
            format: DocumentFormat::Html,
        },
        SetlistCandidate {
            path: format!("{SETLIST_DIR}/{stem}.md"),
            format: DocumentFormat::Markdown,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetlistOutcome {
    Document {
        format: DocumentFormat,
        path: String,
        body: String,
    },
    Unpublished {
        unannounced: bool,
        stem: String,
    },
    Unreachable(FetchError),
}

/// Outcome of loading a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Loaded(String),
    NotFound,
    Unreachable(FetchError),
}

/// Fetches one document, treating a blank body as missing.
pub async fn fetch_document<F, Fut>(path: &str, mut fetch: F) -> DocumentOutcome
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<String>, FetchError>>,
{
    match fetch(path.to_string()).await {
        Ok(Some(body)) if !body.trim().is_empty() => DocumentOutcome::Loaded(body),
        Ok(_) => DocumentOutcome::NotFound,
        Err(err) => DocumentOutcome::Unreachable(err),
    }
}

/// Locates the setlist of `stop`, trying each candidate in turn. A transport
/// failure stops the search. Nothing is retried.
pub async fn resolve_setlist<F, Fut>(
    stop: &TourStop,
    dated_index: usize,
    mut fetch: F,
) -> SetlistOutcome
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<String>, FetchError>>,
{
    let stem = setlist_file_stem(stop, dated_index);
    for candidate in setlist_candidates(&stem) {
        match fetch_document(&candidate.path, &mut fetch).await {
            DocumentOutcome::Loaded(body) => {
                return SetlistOutcome::Document {
                    format: candidate.format,
                    path: candidate.path,
                    body,
                }
            }
            DocumentOutcome::NotFound => {}
            DocumentOutcome::Unreachable(err) => return SetlistOutcome::Unreachable(err),
        }
    }
    SetlistOutcome::Unpublished {
        unannounced: is_setlist_unannounced(stop),
        stem,
    }
}

/// The markdown tabs shown beside the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTab {
    Songlist,
    Staffs,
    Bonus,
    About,
}

impl ContentTab {
    pub const ALL: [Self; 4] = [Self::Songlist, Self::Staffs, Self::Bonus, Self::About];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Songlist => "songlist.md",
            Self::Staffs => "staffs.md",
            Self::Bonus => "bonus.md",
            Self::About => "about.md",
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Songlist => "nav.songlist",
            Self::Staffs => "nav.staffs",
            Self::Bonus => "nav.bonus",
            Self::About => "nav.about",
        }
    }

    pub const fn loading_key(self) -> &'static str {
        match self {
            Self::Songlist => "loading.songlist",
            Self::Staffs => "loading.staffs",
            Self::Bonus => "loading.bonus",
            Self::About => "loading.about",
        }
    }
}

/// A `lyric-trigger` span found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLink {
    pub file: String,
    pub title: String,
}

impl LyricLink {
    pub fn path(&self) -> String {
        format!("{LYRICS_DIR}/{}", self.file)
    }
}

/// Extracts `<span class="lyric-trigger" data-lyric-file="...">` elements,
/// in document order. Attribute order does not matter.
pub fn lyric_triggers(document: &str) -> Vec<LyricLink> {
    SPAN_RE
        .captures_iter(document)
        .filter(|caps| LYRIC_CLASS_RE.is_match(&caps[1]))
        .filter_map(|caps| {
            let file = LYRIC_FILE_RE.captures(&caps[1])?[1].trim().to_string();
            let title = strip_tags(&caps[2]).trim().to_string();
            let title = if title.is_empty() { file.clone() } else { title };
            Some(LyricLink { file, title })
        })
        .collect()
}
