use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, popup_block, ClearWidget};
use crate::ui::widgets::status::legend_line;

const SECTIONS: [&str; 4] = ["help.maps", "help.tabs", "help.document", "help.general"];

pub fn render_help_popup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            app.t("app.title").to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for key in SECTIONS {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::Yellow)),
            Span::raw(app.t(key).to_string()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(legend_line(app));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(popup_block(app.t("help.title"), Color::Yellow))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "F1 / ? / Esc",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
