use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tour_itinerary::{Block, Span as DocSpan, SpanStyle};

fn span_style(style: SpanStyle) -> Style {
    match style {
        SpanStyle::Plain => Style::default(),
        SpanStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
        SpanStyle::Italic => Style::default().add_modifier(Modifier::ITALIC),
        SpanStyle::Code => Style::default().fg(Color::Yellow),
    }
}

fn styled(spans: &[DocSpan], base: Style) -> Vec<Span<'static>> {
    spans
        .iter()
        .map(|span| Span::styled(span.text.clone(), base.patch(span_style(span.style))))
        .collect()
}

/// Turns parsed document blocks into styled lines, one blank line between
/// blocks.
pub fn document_lines(blocks: &[Block]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 && !matches!(block, Block::Bullet(_) | Block::Numbered { .. }) {
            lines.push(Line::from(""));
        }
        match block {
            Block::Heading { level, spans } => {
                let color = if *level <= 1 { Color::Cyan } else { Color::LightBlue };
                let base = Style::default().fg(color).add_modifier(Modifier::BOLD);
                lines.push(Line::from(styled(spans, base)));
            }
            Block::Bullet(spans) => {
                let mut row = vec![Span::styled("  • ", Style::default().fg(Color::Cyan))];
                row.extend(styled(spans, Style::default()));
                lines.push(Line::from(row));
            }
            Block::Numbered { number, spans } => {
                let mut row = vec![Span::styled(
                    format!("  {number}. "),
                    Style::default().fg(Color::Cyan),
                )];
                row.extend(styled(spans, Style::default()));
                lines.push(Line::from(row));
            }
            Block::Quote(spans) => {
                let mut row = vec![Span::styled("│ ", Style::default().fg(Color::DarkGray))];
                row.extend(styled(spans, Style::default().fg(Color::Gray)));
                lines.push(Line::from(row));
            }
            Block::Rule => lines.push(Line::from(Span::styled(
                "─".repeat(24),
                Style::default().fg(Color::DarkGray),
            ))),
            Block::Code(code) => {
                for row in code {
                    lines.push(Line::from(Span::styled(
                        format!("  {row}"),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
            Block::Paragraph(spans) => lines.push(Line::from(styled(spans, Style::default()))),
        }
    }
    lines
}
