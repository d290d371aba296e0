pub mod app;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod event;
pub mod logging;
pub mod terminal;
pub mod ui;

use chrono::Local;
use color_eyre::Result;
use tour_itinerary::{Language, MapScope};
use tracing::{info, warn};

use crate::app::{App, AppActions};
use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::content::ContentClient;
use crate::db::{create_database_pool, load_preferences, Preferences};

/// Opens the preferences store. The app works without it.
async fn open_preferences(config: &AppConfig) -> (Option<sqlx::SqlitePool>, Preferences) {
    match create_database_pool(&config.database_url()).await {
        Ok(pool) => {
            let prefs = load_preferences(&pool).await.unwrap_or_else(|e| {
                warn!(error = %e, "failed to read preferences");
                Preferences::default()
            });
            (Some(pool), prefs)
        }
        Err(e) => {
            warn!(error = %e, "preferences database unavailable");
            (None, Preferences::default())
        }
    }
}

/// Command line and environment win over stored preferences.
fn starting_point(args: &CliArgs, config: &AppConfig, prefs: Preferences) -> (Language, MapScope) {
    let language = config.language.or(prefs.language).unwrap_or_default();
    let scope = args.scope.or(prefs.scope).unwrap_or_default();
    (language, scope)
}

pub async fn run(args: CliArgs) -> Result<()> {
    let config = config::load_app_config()?;
    let headless = args.headless || !is_terminal();
    logging::init_tracing(&config, headless)?;
    info!(data_root = %config.data_root.describe(), headless, "starting");

    let client = ContentClient::from_config(&config)?;
    let (pool, prefs) = open_preferences(&config).await;
    let (language, scope) = starting_point(&args, &config, prefs);

    if headless {
        let translator = client.load_translator(language).await;
        let today = args.today.unwrap_or_else(|| Local::now().date_naive());
        return event::run_headless(&client, &translator, scope, today, args.json).await;
    }

    let (mut actions, mut events) = AppActions::new(client);
    actions.db_pool = pool;
    let mut app = App::new(actions, language, scope);
    app.today_override = args.today;

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app, &mut events).await;
    terminal::cleanup(true, true);
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env::VarError;

    fn config() -> Result<AppConfig> {
        Ok(config::build_app_config(|_| Err(VarError::NotPresent))?)
    }

    #[test]
    fn cli_scope_overrides_stored_preference() -> Result<()> {
        let args = CliArgs::try_parse_from(["tour-map", "--scope", "china"])?;
        let prefs = Preferences {
            language: Some(Language::En),
            scope: Some(MapScope::International),
        };
        assert_eq!(
            starting_point(&args, &config()?, prefs),
            (Language::En, MapScope::Domestic)
        );
        Ok(())
    }

    #[test]
    fn defaults_without_preferences() -> Result<()> {
        let args = CliArgs::try_parse_from(["tour-map"])?;
        assert_eq!(
            starting_point(&args, &config()?, Preferences::default()),
            (Language::default(), MapScope::default())
        );
        Ok(())
    }
}
