use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, popup_block, ClearWidget};
use crate::ui::widgets::tables::visible_rows;
use crate::ui::widgets::tour_map::{render_tour_map, status_color};

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    if let Some(error) = &app.load_error {
        let paragraph = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                app.t("error.itinerary").to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(error.clone(), Style::default().fg(Color::Gray))),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    render_tour_map(&app.scene, app.cursor, app.t(app.scope.label_key()), f, chunks[0]);
    render_stop_panel(app, f, chunks[1]);

    if !app.dispatcher.pending().is_empty() {
        render_choice_popup(app, f, area);
    }
}

/// Stops of the current map, the one under the cursor highlighted, with
/// its tooltip underneath.
fn render_stop_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.t("map.cursor")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    if app.scene.is_empty() {
        let empty = Paragraph::new(app.t("map.empty").to_string())
            .style(Style::default().fg(Color::Gray))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(inner);

    let points = &app.scene.points;
    let rows = visible_rows(points.len(), usize::from(chunks[0].height), app.cursor);
    let lines: Vec<Line<'_>> = points[rows.clone()]
        .iter()
        .zip(rows)
        .map(|(point, position)| {
            let selected = position == app.cursor;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", point.status.icon()),
                    Style::default().fg(status_color(point.status)),
                ),
                Span::styled(point.label.clone(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[0]);

    if let Some(point) = points.get(app.cursor) {
        let tooltip: Vec<Line<'_>> = point
            .tooltip
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if i == 0 {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(text.clone(), style))
            })
            .collect();
        let paragraph = Paragraph::new(tooltip)
            .block(Block::default().borders(Borders::TOP))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, chunks[1]);
    }
}

fn render_choice_popup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 50, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            app.t("map.chooseStop").to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    for (i, candidate) in app.dispatcher.pending().iter().enumerate() {
        let selected = i == app.choice_index;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let prefix = if selected { ">" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{prefix} "), style),
            Span::styled(
                format!("{} ", candidate.status.icon()),
                Style::default().fg(status_color(candidate.status)),
            ),
            Span::styled(format!("{}  {}", candidate.name, candidate.date_text), style),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(popup_block(app.t("select.city"), Color::Yellow))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}
