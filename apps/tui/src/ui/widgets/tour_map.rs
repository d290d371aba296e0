use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;
use tour_itinerary::{Scene, StopStatus};

pub fn status_color(status: StopStatus) -> Color {
    let (r, g, b) = status.rgb();
    Color::Rgb(r, g, b)
}

/// `#RRGGBB` to a terminal color.
pub fn hex_color(hex: &str, fallback: Color) -> Color {
    hex.parse().unwrap_or(fallback)
}

/// Width/height of `area` in map degrees. Terminal cells are about twice
/// as tall as they are wide.
fn area_aspect(area: Rect) -> f64 {
    if area.height == 0 {
        return 0.0;
    }
    f64::from(area.width) / (f64::from(area.height) * 2.0)
}

/// Draws the world outline with the scene on top: region names, the tour
/// path, one marker per stop and the cursor.
pub fn render_tour_map(scene: &Scene, cursor: usize, title: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    let (x_bounds, y_bounds) = scene.viewport.bounds(area_aspect(inner));

    let path_color = hex_color(scene.path_color, Color::Blue);
    let border = scene
        .regions
        .first()
        .map_or(Color::Blue, |region| hex_color(region.border, Color::Blue));

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
                let color = status_color(point.status);
                ctx.draw(&Points {
                    coords: &[(coord.lng, coord.lat)],
                    color,
                });
                let style = if position == cursor {
                    Style::default()
                        .fg(Color::Black)
                        .bg(color)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                let symbol = if position == cursor { "◆" } else { "●" };
                ctx.print(coord.lng, coord.lat, Span::styled(symbol, style));
            }

            if let Some(point) = scene.points.get(cursor) {
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

    // Region names are listed along the bottom edge; the outline data has
    // no polygons to fill.
    if !scene.regions.is_empty() && inner.height > 2 {
        let names: Vec<&str> = scene.regions.iter().map(|r| r.name.as_str()).collect();
        let legend = ratatui::widgets::Paragraph::new(Span::styled(
            format!(" {} ", names.join(" · ")),
            Style::default().fg(border),
        ));
        let row = Rect {
            x: inner.x,
            y: inner.y + inner.height - 1,
            width: inner.width,
            height: 1,
        };
        f.render_widget(legend, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#2196F3", Color::Red), Color::Rgb(0x21, 0x96, 0xF3));
        assert_eq!(hex_color("nope", Color::Red), Color::Red);
    }

    #[test]
    fn aspect_accounts_for_cell_shape() {
        let area = Rect::new(0, 0, 80, 20);
        assert!((area_aspect(area) - 2.0).abs() < f64::EPSILON);
        assert!(area_aspect(Rect::new(0, 0, 10, 0)).abs() < f64::EPSILON);
    }
}
