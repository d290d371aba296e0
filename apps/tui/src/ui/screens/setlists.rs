use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use tour_itinerary::{stop_status, TourStop};

use crate::app::App;
use crate::ui::widgets::tables::visible_rows;
use crate::ui::widgets::tour_map::status_color;

pub fn render_setlists(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(6)])
        .split(area);

    render_filter(app, f, chunks[0]);
    render_city_table(app, f, chunks[1]);
    render_stop_details(app, f, chunks[2]);
}

fn render_filter(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border = if app.browser.filtering {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let cursor = if app.browser.filtering { "_" } else { "" };
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled("/ ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{}{cursor}", app.browser.filter)),
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", app.t("setlist.filter")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn render_city_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.t("setlist.selectCityPrompt")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let today = app.scene.today;
    let visible_height = usize::from(area.height.saturating_sub(3));
    let range = visible_rows(app.browser.matches.len(), visible_height, app.browser.selected);

    let rows: Vec<Row<'_>> = app.browser.matches[range.clone()]
        .iter()
        .zip(range)
        .filter_map(|(&stop_index, position)| {
            let stop = app.stops.get(stop_index)?;
            let status = stop_status(stop, today);
            let style = if position == app.browser.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Some(
                Row::new(vec![
                    Cell::from(Span::styled(
                        status.icon(),
                        Style::default().fg(status_color(status)),
                    )),
                    Cell::from(stop.date_text.clone()),
                    Cell::from(stop.display_city()),
                    Cell::from(stop.name.clone()),
                ])
                .style(style),
            )
        })
        .collect();

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from(app.t("setlist.info.date").to_string()),
        Cell::from(app.t("setlist.info.location").to_string()),
        Cell::from(app.t("select.city").to_string()),
    ])
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(26),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}

fn render_stop_details(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.t("setlist.info.title")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(stop) = app
        .browser
        .selected_stop()
        .and_then(|index| app.stops.get(index))
    else {
        f.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(Span::styled(
            stop.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{}: ", app.t("setlist.info.venue")), label),
            Span::raw(stop.venue.clone()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", app.t("setlist.info.date")), label),
            Span::raw(stop.date_text.clone()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", app.t("setlist.info.location")), label),
            Span::raw(location_text(stop)),
        ]),
    ];
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Province and city, or the country for stops without a province.
fn location_text(stop: &TourStop) -> String {
    format!(
        "{} {}",
        stop.province().unwrap_or(stop.country.as_str()),
        stop.display_city()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_itinerary::parse_itinerary;

    #[test]
    fn location_prefers_province() -> Result<(), Box<dyn std::error::Error>> {
        let stops = parse_itinerary(
            r#"[
                {"name": "成都站", "date": "2025-08-01", "coord": [104.06, 30.67], "country": "China", "province": "四川", "city": "成都", "location": "凤凰山"},
                {"name": "Seoul", "date": "2025-10-01", "coord": [126.98, 37.57], "country": "Korea", "city": "Seoul", "location": "KSPO"}
            ]"#,
        )?;
        assert_eq!(location_text(&stops[0]), "四川 成都");
        assert_eq!(location_text(&stops[1]), "Korea Seoul");
        Ok(())
    }
}
