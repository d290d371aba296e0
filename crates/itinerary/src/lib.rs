//! Core of the tour map: itinerary records, date ranges, stop status,
//! marker placement, camera estimation and the declarative map scene.
//!
//! Nothing in this crate performs I/O or reads the clock. Callers pass
//! "today" and perform fetches themselves.

pub mod content;
pub mod dates;
pub mod dedup;
pub mod error;
pub mod i18n;
pub mod markdown;
pub mod scene;
pub mod scope;
pub mod selection;
pub mod session;
pub mod status;
pub mod stop;
pub mod viewport;

pub use content::{
    dated_position, fetch_document, lyric_triggers, normalize_file_stem, resolve_setlist,
    setlist_file_stem, ContentTab, DocumentFormat, DocumentOutcome, LyricLink, SetlistOutcome,
};
pub use dates::{parse_date_range, DateRange, RANGE_SEPARATOR};
pub use dedup::{spread_overlapping, CoordKey, CoordinateIndex, Placement};
pub use error::{FetchError, ItineraryError};
pub use i18n::{Language, Translator};
pub use markdown::{html_blocks, html_to_text, parse_markdown, Block, Span, SpanStyle};
pub use scene::{render_scene, PathSegment, RegionHighlight, RegionKind, Scene, ScenePoint};
pub use scope::MapScope;
pub use selection::{Candidate, Dispatcher, SelectionOutcome};
pub use session::{Generation, RequestToken};
pub use status::{classify, classify_name, stop_status, StopStatus};
pub use stop::{parse_itinerary, Coordinate, TourStop};
pub use viewport::{estimate_viewport, ViewState};
