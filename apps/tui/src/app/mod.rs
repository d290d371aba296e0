pub mod actions;
pub mod input;
pub mod state;

pub use actions::{AppActions, AppEvent, FetchResult};
pub use input::handle_input;
pub use state::{App, AppScreen, DocumentBody, DocumentSource, DocumentView, LyricPopup, SetlistBrowser};
