// mapty-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{
        form::render_form, map::render_map, modals::render_modal, sidebar::render_sidebar,
        status_bar::render_status_bar,
    },
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use std::time::Instant;

/// Rows taken by the form panel: four fields plus borders.
const FORM_HEIGHT: u16 = 6;

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Content on top, status bar at the bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    // Map on the left, sidebar on the right
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_chunks[0]);

    render_map(f, app, content_chunks[0]);
    render_sidebar_column(f, app, content_chunks[1]);
    render_status_bar(f, app, main_chunks[1]);

    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

fn render_sidebar_column(f: &mut Frame, app: &mut App, area: Rect) {
    let form = app.controller.form();
    // The form's slot stays reserved while it is fading out
    let form_slot = form.is_visible() || form.in_transition(Instant::now());
    if !form_slot {
        render_sidebar(f, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
        .split(area);
    if app.controller.form().is_visible() {
        render_form(f, app, chunks[0]);
    }
    render_sidebar(f, app, chunks[1]);
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
