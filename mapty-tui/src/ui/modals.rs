// mapty-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::centered_rect,
};
use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::Alert(message) => render_alert_modal(f, message),
        ActiveModal::ConfirmReset => render_confirm_reset_modal(f, app),
        ActiveModal::None => {}
    }
}

fn modal_frame(f: &mut Frame, title: &str, area: Rect) -> Rect {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    })
}

fn render_help_modal(f: &mut Frame) {
    let area = modal_frame(f, "Help (?)", centered_rect(60, 70, f.size()));

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q: Quit Application"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" R: Delete All Workouts"),
        Line::from(" m: Retry Loading The Map"),
        Line::from(""),
        Line::from("--- Map ---").style(Style::new().bold().underlined()),
        Line::from(" Click: Log A Workout Here"),
        Line::from(" a / Space: Log A Workout At The Map Centre"),
        Line::from(" ←↑↓→: Pan"),
        Line::from(" + / - / Scroll: Zoom In / Out"),
        Line::from(""),
        Line::from("--- Workouts ---").style(Style::new().bold().underlined()),
        Line::from(" k / j: Navigate Up / Down"),
        Line::from(" Enter / Click: Show Workout On The Map"),
        Line::from(""),
        Line::from("--- Form ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / ↓, Shift+Tab / ↑: Next / Previous Field"),
        Line::from(" ← / → / Space on Type: Switch Running <=> Cycling"),
        Line::from(" Enter: Save Workout"),
        Line::from(" Esc: Cancel"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_alert_modal(f: &mut Frame, message: &str) {
    let area = modal_frame(f, "Alert", centered_rect(50, 25, f.size()));
    let text = vec![
        Line::from(message.to_string()).bold(),
        Line::from(""),
        Line::from(Span::styled(" [Enter] OK ", Style::new().italic().yellow())),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_confirm_reset_modal(f: &mut Frame, app: &App) {
    let area = modal_frame(f, "Confirm Reset", centered_rect(50, 25, f.size()));
    let count = app.controller.workouts().len();
    let text = vec![
        Line::from(format!("Delete all {count} workouts?")).bold(),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            " [y] Delete | [n/Esc] Keep ",
            Style::new().italic().yellow(),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
