use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, DocumentBody};
use crate::ui::widgets::markdown::document_lines;
use crate::ui::widgets::popup::{centered_rect, popup_block, ClearWidget};

fn body_lines(app: &App, body: &DocumentBody) -> Vec<Line<'static>> {
    match body {
        DocumentBody::Loading(key) => vec![Line::from(Span::styled(
            app.t(key).to_string(),
            Style::default().fg(Color::Cyan),
        ))],
        DocumentBody::Loaded(blocks) => document_lines(blocks),
        DocumentBody::Message(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ))],
    }
}

pub fn render_document(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(doc) = app.document.as_ref() else {
        return;
    };

    let link_rows = if doc.lyric_links.is_empty() { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(link_rows)])
        .split(area);

    let paragraph = Paragraph::new(body_lines(app, &doc.body))
        .block(
            Block::default()
                .title(format!(" {} ", app.document_title()))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((doc.scroll, 0));
    f.render_widget(paragraph, chunks[0]);

    if !doc.lyric_links.is_empty() {
        let mut spans = Vec::new();
        for (i, link) in doc.lyric_links.iter().enumerate() {
            let style = if i == doc.selected_link {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Magenta)
            };
            spans.push(Span::styled(format!(" ♪ {} ", link.title), style));
            spans.push(Span::raw(" "));
        }
        let links = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(format!(" {} [ ] ", app.t("lyrics.links")))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(links, chunks[1]);
    }

    if let Some(popup) = app.lyric.as_ref() {
        let popup_area = centered_rect(70, 80, area);
        f.render_widget(ClearWidget, popup_area);
        let title = format!("{}: {}", app.t("lyrics.title"), popup.link.title);
        let paragraph = Paragraph::new(body_lines(app, &popup.body))
            .block(popup_block(&title, Color::Magenta))
            .wrap(Wrap { trim: false })
            .scroll((popup.scroll, 0));
        f.render_widget(paragraph, popup_area);
    }
}
