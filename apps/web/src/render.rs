use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution},
        Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};
use tour_itinerary::{Block as DocBlock, MapScope, StopStatus};

use crate::dashboard::{Dashboard, PaneBody};
use crate::pulse::{pulse_marker, spinner_frame};

fn status_color(status: StopStatus) -> Color {
    let (r, g, b) = status.rgb();
    Color::Rgb(r, g, b)
}

pub fn render_dashboard(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(10),
        ])
        .split(area);

    render_header(dashboard, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(main_layout[1]);

    render_map_panel(dashboard, f, content[0]);
    render_content_pane(dashboard, f, content[1]);
    render_stop_table(dashboard, f, main_layout[2]);
}

fn render_header(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let titles = [
        "nav.china",
        "nav.world",
        "nav.songlist",
        "nav.staffs",
        "nav.bonus",
        "nav.about",
    ]
    .iter()
    .enumerate()
    .map(|(i, key)| TextLine::from(format!("{} {}", i + 1, dashboard.t(key))))
    .collect::<Vec<_>>();

    let selected = match dashboard.scope {
        MapScope::Domestic => 0,
        MapScope::International => 1,
    };

    let spinner = if dashboard.in_flight {
        spinner_frame(dashboard.phase)
    } else {
        " "
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(format!(
                    " {} {spinner} [l] {} ",
                    dashboard.t("app.title"),
                    dashboard.t("lang.name")
                ))
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x21, 0x96, 0xF3))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, area);
}

fn render_map_panel(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(dashboard.t(dashboard.scope.label_key()).to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(error) = dashboard.load_error.as_ref() {
        let paragraph = Paragraph::new(Text::from(vec![
            TextLine::from(Span::styled(
                dashboard.t("error.itinerary").to_string(),
                Style::default().fg(Color::Red),
            )),
            TextLine::from(error.clone()),
        ]))
        .block(block)
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    if !dashboard.loaded {
        let paragraph = Paragraph::new(dashboard.t("loading.itinerary").to_string())
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let scene = &dashboard.scene;
    let inner = block.inner(area);
    let aspect = if inner.height == 0 {
        0.0
    } else {
        f64::from(inner.width) / (f64::from(inner.height) * 2.0)
    };
    let (x_bounds, y_bounds) = scene.viewport.bounds(aspect);
    let path_color = scene
        .path_color
        .parse::<Color>()
        .unwrap_or(Color::Blue);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for segment in &scene.path {
                ctx.draw(&CanvasLine {
                    x1: segment.from.lng,
                    y1: segment.from.lat,
                    x2: segment.to.lng,
                    y2: segment.to.lat,
                    color: path_color,
                });
            }
            ctx.layer();
            for (position, point) in scene.points.iter().enumerate() {
                let coord = point.coordinate();
                let glyph = if position == dashboard.selected {
                    pulse_marker(dashboard.phase)
                } else {
                    "•"
                };
                ctx.print(
                    coord.lng,
                    coord.lat,
                    Span::styled(glyph, Style::default().fg(status_color(point.status))),
                );
            }
            if let Some(point) = scene.points.get(dashboard.selected) {
                let coord = point.coordinate();
                ctx.print(
                    coord.lng,
                    coord.lat,
                    Span::styled(
                        format!("  {}", point.label),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    f.render_widget(canvas, area);
}

fn doc_lines(blocks: &[DocBlock]) -> Vec<TextLine<'static>> {
    let mut lines = Vec::new();
    for block in blocks {
        let text = block.plain_text();
        match block {
            DocBlock::Heading { .. } => {
                lines.push(TextLine::from(""));
                lines.push(TextLine::from(Span::styled(
                    text,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            DocBlock::Bullet(_) => lines.push(TextLine::from(format!("  • {text}"))),
            DocBlock::Numbered { number, .. } => {
                lines.push(TextLine::from(format!("  {number}. {text}")));
            }
            DocBlock::Quote(_) => lines.push(TextLine::from(Span::styled(
                format!("│ {text}"),
                Style::default().fg(Color::Gray),
            ))),
            DocBlock::Rule => lines.push(TextLine::from("────────")),
            DocBlock::Code(_) | DocBlock::Paragraph(_) => {
                lines.extend(text.lines().map(|l| TextLine::from(l.to_string())));
            }
        }
    }
    lines
}

fn render_content_pane(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let pane = &dashboard.pane;
    let title = if pane.title.is_empty() {
        dashboard.t("setlist.selectCityPrompt").to_string()
    } else {
        pane.title.clone()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let lines = match &pane.body {
        PaneBody::Idle => vec![TextLine::from(Span::styled(
            dashboard.t("help.maps").to_string(),
            Style::default().fg(Color::Gray),
        ))],
        PaneBody::Loading(key) => vec![TextLine::from(format!(
            "{} {}",
            spinner_frame(dashboard.phase),
            dashboard.t(key)
        ))],
        PaneBody::Blocks(blocks) => doc_lines(blocks),
        PaneBody::Message(message) => vec![TextLine::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ))],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((pane.scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_stop_table(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from(dashboard.t("setlist.info.date").to_string()),
        Cell::from(dashboard.t("setlist.info.location").to_string()),
        Cell::from(dashboard.t("setlist.info.venue").to_string()),
    ])
    .style(
        Style::default()
            .fg(Color::Rgb(0x19, 0x76, 0xD2))
            .bg(Color::Rgb(0xBB, 0xDE, 0xFB))
            .add_modifier(Modifier::BOLD),
    );

    let visible = usize::from(area.height.saturating_sub(3)).max(1);
    let offset = dashboard.selected.saturating_sub(visible - 1);
    let rows = dashboard
        .scene
        .points
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(position, point)| {
            let venue = dashboard
                .stops
                .get(point.stop_index)
                .map_or_else(String::new, |stop| stop.venue.clone());
            let style = if position == dashboard.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    point.status.icon(),
                    Style::default().fg(status_color(point.status)),
                )),
                Cell::from(point.date_text.clone()),
                Cell::from(point.label.clone()),
                Cell::from(venue),
            ])
            .style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(26),
            Constraint::Length(20),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(table, area);
}
