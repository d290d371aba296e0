use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use tour_itinerary::MapScope;

#[derive(Debug, Parser)]
#[command(name = "tour-map", version, about = "Concert tour itinerary map")]
pub struct CliArgs {
    /// Print the itinerary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override preferences database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Directory or http(s) URL holding itinerary.json and the documents
    #[arg(long, value_name = "PATH|URL")]
    pub data: Option<String>,

    /// Interface language (zh-CN or en)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Override log file path
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Map to start on (china or world)
    #[arg(long, value_parser = parse_scope)]
    pub scope: Option<MapScope>,

    /// Classify stops against this day instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,
}

fn parse_scope(raw: &str) -> Result<MapScope, String> {
    MapScope::parse(raw).ok_or_else(|| format!("unknown map {raw:?}, expected china or world"))
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| e.to_string())
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(data) = &self.data {
            std::env::set_var("TOUR_DATA_ROOT", data);
        }
        if let Some(lang) = &self.lang {
            std::env::set_var("TOUR_LANG", lang);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("TOUR_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scope_and_day() -> Result<(), clap::Error> {
        let args = CliArgs::try_parse_from([
            "tour-map",
            "--headless",
            "--scope",
            "world",
            "--today",
            "2025-06-01",
        ])?;
        assert!(args.headless);
        assert_eq!(args.scope, Some(MapScope::International));
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2025, 6, 1));
        Ok(())
    }

    #[test]
    fn rejects_unknown_scope() {
        assert!(CliArgs::try_parse_from(["tour-map", "--scope", "moon"]).is_err());
        assert!(CliArgs::try_parse_from(["tour-map", "--today", "06/01/2025"]).is_err());
    }

    #[test]
    fn help_mentions_data_root() {
        assert!(CliArgs::help_text().contains("--data"));
    }
}
