pub mod migrations;
pub mod models;
pub mod queries;

pub use migrations::{create_database_pool, setup_database};
pub use models::{PreferenceKey, PreferenceRecord, Preferences};
pub use queries::{get_preference, load_preferences, save_preferences, set_preference};
