use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tour_itinerary::{
    dated_position, render_scene, setlist_file_stem, ContentTab, MapScope, Scene, StopStatus, TourStop,
    Translator,
};
use tracing::{debug, info};

use crate::app::{handle_input, App, AppEvent};
use crate::content::ContentClient;
use crate::terminal::Tui;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the main application event loop
pub async fn run(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    app.start();

    while app.running {
        while let Ok(fetched) = events.try_recv() {
            app.handle_event(fetched);
        }

        app.update();

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                }
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned fetches make progress between frames.
        tokio::task::yield_now().await;
    }

    info!("leaving event loop");
    Ok(())
}

#[derive(Debug, Serialize)]
struct HeadlessStop<'a> {
    index: usize,
    status: StopStatus,
    date: &'a str,
    city: String,
    name: &'a str,
    /// Absent for stops without a date.
    setlist_stem: Option<String>,
}

#[derive(Debug, Serialize)]
struct HeadlessReport<'a> {
    data_root: String,
    stops: Vec<HeadlessStop<'a>>,
    scene: &'a Scene,
    tabs: Vec<&'static str>,
}

/// Loads the itinerary and prints it, as a table or as JSON, instead of
/// starting the UI.
pub async fn run_headless(
    client: &ContentClient,
    translator: &Translator,
    scope: MapScope,
    today: chrono::NaiveDate,
    json: bool,
) -> Result<()> {
    let stops = client.load_itinerary().await?;
    info!(count = stops.len(), scope = scope.as_str(), "rendering headless report");
    let scene = render_scene(&stops, scope, today, translator);

    if json {
        let report = build_report(client, &stops, &scene, today);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_table(client, &stops, &scene, today, translator);
    }
    Ok(())
}

fn build_report<'a>(
    client: &ContentClient,
    stops: &'a [TourStop],
    scene: &'a Scene,
    today: chrono::NaiveDate,
) -> HeadlessReport<'a> {
    let report_stops = stops
        .iter()
        .enumerate()
        .map(|(index, stop)| HeadlessStop {
            index,
            status: tour_itinerary::stop_status(stop, today),
            date: &stop.date_text,
            city: stop.display_city(),
            name: &stop.name,
            setlist_stem: dated_position(stops, index).map(|n| setlist_file_stem(stop, n)),
        })
        .collect();

    HeadlessReport {
        data_root: client.describe(),
        stops: report_stops,
        scene,
        tabs: ContentTab::ALL.iter().map(|tab| tab.path()).collect(),
    }
}

fn render_headless_table(
    client: &ContentClient,
    stops: &[TourStop],
    scene: &Scene,
    today: chrono::NaiveDate,
    translator: &Translator,
) {
    println!("\n{} ({})", translator.t("app.title"), client.describe());
    println!("{}", "=".repeat(40));
    println!(
        "{}: {} / {}",
        translator.t(scene.scope.label_key()),
        scene.points.len(),
        stops.len()
    );
    println!();

    for (index, stop) in stops.iter().enumerate() {
        let status = tour_itinerary::stop_status(stop, today);
        println!(
            "{:>3} {} {:<10} | {:<24} | {:<10} | {} | {}",
            index + 1,
            status.icon(),
            translator.t(status.label_key()),
            stop.date_text,
            stop.display_city(),
            stop.name,
            dated_position(stops, index)
                .map_or_else(|| "-".to_string(), |n| setlist_file_stem(stop, n)),
        );
    }

    if !scene.regions.is_empty() {
        let names: Vec<&str> = scene.regions.iter().map(|r| r.name.as_str()).collect();
        println!("\n{}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataRoot;
    use chrono::NaiveDate;
    use tour_itinerary::{parse_itinerary, Language};

    #[test]
    fn report_carries_stems_and_scene() -> Result<()> {
        let stops = parse_itinerary(
            r#"[
                {"name": "成都站", "date": "2025-08-01", "coord": [104.06, 30.67], "country": "China", "city": "成都", "location": "凤凰山", "setlist-name": "chengdu"},
                {"name": "Tokyo", "date": "", "coord": [139.7, 35.7], "country": "Japan", "city": "Tokyo", "location": "Budokan"},
                {"name": "Osaka", "date": "2025-09-01", "coord": [135.5, 34.7], "country": "Japan", "city": "Osaka", "location": "Dome"}
            ]"#,
        )?;
        let today = NaiveDate::from_ymd_opt(2025, 7, 1).ok_or_else(|| eyre!("bad date"))?;
        let translator = Translator::new(Language::En);
        let scene = render_scene(&stops, MapScope::International, today, &translator);
        let client = ContentClient::new(&DataRoot::Dir("demo".into()), 1)?;

        let report = build_report(&client, &stops, &scene, today);
        assert_eq!(report.stops.len(), 3);
        assert_eq!(report.stops[0].setlist_stem.as_deref(), Some("chengdu"));
        assert_eq!(report.stops[1].setlist_stem, None);
        assert_eq!(report.stops[2].setlist_stem.as_deref(), Some("_02_osaka"));
        assert_eq!(report.stops[0].status, StopStatus::Upcoming);
        assert_eq!(report.stops[1].status, StopStatus::Pending);
        assert_eq!(report.tabs.len(), 4);

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["scene"]["base_map"], "world");
        assert_eq!(json["data_root"], "demo");
        Ok(())
    }
}
