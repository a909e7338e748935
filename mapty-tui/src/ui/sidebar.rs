// mapty-tui/src/ui/sidebar.rs
use crate::app::App;
use mapty_lib::WorkoutKind;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.rows();
    let block = Block::default()
        .title(format!(" Workouts ({}) ", rows.len()))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(app.accent));
    app.sidebar_list_area = block.inner(area);

    if rows.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("Click the map to log a workout").italic(),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let color = kind_color(row.kind);
            let title = Line::from(vec![
                Span::styled("▌", Style::new().fg(color)),
                Span::styled(row.title.clone(), Style::new().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  #{}", row.id),
                    Style::new().fg(Color::DarkGray),
                ),
            ]);
            let details = Line::from(vec![
                Span::styled("▌", Style::new().fg(color)),
                Span::raw(row.summary()),
            ]);
            ListItem::new(vec![title, details])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Color::DarkGray))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.sidebar_state);
}

pub fn kind_color(kind: WorkoutKind) -> Color {
    match kind {
        WorkoutKind::Running => Color::Green,
        WorkoutKind::Cycling => Color::Yellow,
    }
}
