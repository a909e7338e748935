// mapty-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, App};
use mapty_lib::FormField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let form = app.controller.form();
    let status_text = match app.active_modal {
        ActiveModal::None if form.is_visible() => {
            if form.focused_field() == FormField::Type {
                " [←→/Space] Switch Type | [Tab/↑↓] Navigate | [Enter] Save | [Esc] Cancel "
            } else {
                " [Tab/↑↓] Navigate | [Enter] Save | [Esc] Cancel "
            }
        }
        ActiveModal::None if app.map().is_none() => {
            " [m] Retry Map | [jk] Nav | [Enter] Select | [R]eset | [?] Help | [q]uit "
        }
        ActiveModal::None => {
            " [Click/a] Log | [←↑↓→] Pan | [+-] Zoom | [jk] Nav | [Enter] Select | [R]eset | [?] Help | [q]uit "
        }
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::Alert(_) => " [Enter/Esc] Dismiss ",
        ActiveModal::ConfirmReset => " [y] Confirm | [n/Esc] Cancel ",
    };

    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
