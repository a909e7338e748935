// mapty-tui/src/ui/map.rs
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

pub fn render_map(f: &mut Frame, app: &mut App, area: Rect) {
    let accent = app.accent;
    let block = Block::default().borders(Borders::ALL).border_style(Style::new().fg(accent));
    let inner = block.inner(area);
    app.map_area = inner;

    let Some(map) = app.map_mut() else {
        let placeholder = Paragraph::new(vec![
            Line::from("Map unavailable").bold(),
            Line::from(""),
            Line::from("Set [home] in the config file or MAPTY_POSITION=\"lat,lng\","),
            Line::from("then press m to try again."),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block.title(" Map "));
        f.render_widget(placeholder, area);
        return;
    };

    map.viewport.width = inner.width;
    map.viewport.height = inner.height;
    let map = &*map;
    let viewport = map.viewport;

    let title = format!(" Map  {}  z{} ", viewport.center, viewport.zoom);
    let attribution = map
        .tiles
        .as_ref()
        .map(|t| format!(" {} ", plain_text(&t.attribution)))
        .unwrap_or_default();

    let canvas = Canvas::default()
        .block(
            block
                .title(Title::from(title).alignment(Alignment::Left))
                .title(
                    Title::from(Span::styled(attribution, Style::new().fg(Color::DarkGray)))
                        .position(Position::Bottom)
                        .alignment(Alignment::Right),
                ),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for marker in map.visible_markers() {
                let color = popup_color(&marker.popup.class_name);
                let x = viewport.frame_lng(marker.coords.lng);
                ctx.draw(&Points {
                    coords: &[(x, marker.coords.lat)],
                    color,
                });
                ctx.print(
                    x,
                    marker.coords.lat,
                    Line::from(Span::styled(
                        format!(" {}", marker.label),
                        Style::new().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });
    f.render_widget(canvas, area);
}

/// Popup colour per workout style class.
fn popup_color(class_name: &str) -> Color {
    match class_name {
        "cycling-popup" => Color::Yellow,
        _ => Color::Green,
    }
}

/// Attribution text without HTML tags or the `&copy;` entity.
fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.replace("&copy;", "©").chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
