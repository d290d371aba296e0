pub mod screens;
pub mod widgets;

use crate::app::state::{AppScreen, DocumentSource};
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;
use tour_itinerary::{ContentTab, MapScope};

/// Header entries in key order; the number key of entry `i` is `i + 1`.
const NAV: [&str; 7] = [
    "nav.china",
    "nav.world",
    "nav.songlist",
    "nav.setlist",
    "nav.staffs",
    "nav.bonus",
    "nav.about",
];

fn selected_nav(app: &App) -> usize {
    match (app.screen, app.document.as_ref().map(|doc| &doc.source)) {
        (AppScreen::Setlists, _) | (AppScreen::Document, Some(DocumentSource::Setlist { .. })) => 3,
        (AppScreen::Document, Some(DocumentSource::Tab(tab))) => match tab {
            ContentTab::Songlist => 2,
            ContentTab::Staffs => 4,
            ContentTab::Bonus => 5,
            ContentTab::About => 6,
        },
        _ => match app.scope {
            MapScope::Domestic => 0,
            MapScope::International => 1,
        },
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles: Vec<Line<'_>> = NAV
        .iter()
        .enumerate()
        .map(|(i, key)| Line::from(format!("{} {}", i + 1, app.t(key))))
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected_nav(app))
        .block(
            Block::default()
                .title(Line::from(vec![
                    Span::styled(
                        format!(" {} ", app.t("app.title")),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("[l] {} ", app.t("lang.name")),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(5),    // Screen
            Constraint::Length(2), // Status
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_header(app, f, layout[0]);

    match app.screen {
        AppScreen::Map => screens::map::render_map(app, f, layout[1]),
        AppScreen::Setlists => screens::setlists::render_setlists(app, f, layout[1]),
        AppScreen::Document => screens::document::render_document(app, f, layout[1]),
    }

    widgets::status::render_status_bar(app, f, layout[2]);

    if app.show_help {
        screens::help::render_help_popup(app, f, layout[1]);
    }
}
