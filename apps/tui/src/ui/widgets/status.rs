use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};
use tour_itinerary::StopStatus;

use crate::app::App;
use crate::ui::widgets::tour_map::status_color;

const LEGEND: [StopStatus; 5] = [
    StopStatus::Finished,
    StopStatus::Ongoing,
    StopStatus::Upcoming,
    StopStatus::Pending,
    StopStatus::Unannounced,
];

pub fn legend_line(app: &App) -> Line<'static> {
    let mut spans = Vec::new();
    for status in LEGEND {
        spans.push(Span::styled(
            format!("{} ", status.icon()),
            Style::default().fg(status_color(status)),
        ));
        spans.push(Span::raw(format!("{}  ", app.t(status.label_key()))));
    }
    Line::from(spans)
}

/// Spinner while a request is in flight, then the last status message.
pub fn render_status_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    if app.in_flight.is_some() || app.loading_itinerary {
        let label = if app.loading_itinerary {
            app.t("loading.itinerary").to_string()
        } else {
            String::new()
        };
        let throbber = Throbber::default()
            .label(label)
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, chunks[0], &mut state);
    } else {
        let message = Paragraph::new(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Yellow),
        ));
        f.render_widget(message, chunks[0]);
    }

    f.render_widget(Paragraph::new(legend_line(app)), chunks[1]);
}
