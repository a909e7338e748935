// mapty-tui/src/ui/form.rs
use crate::{app::App, ui::sidebar::kind_color};
use mapty_lib::{FormField, WorkoutForm};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LABEL_WIDTH: usize = 12;

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Type => "Type",
        FormField::Distance => "Distance",
        FormField::Duration => "Duration",
        FormField::Cadence => "Cadence",
        FormField::Elevation => "Elev Gain",
    }
}

fn field_placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Type => "",
        FormField::Distance => "km",
        FormField::Duration => "min",
        FormField::Cadence => "step/min",
        FormField::Elevation => "meters",
    }
}

pub fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let form = app.controller.form();
    let Some(pending) = form.pending_coords() else {
        return;
    };

    let block = Block::default()
        .title(format!(" New workout at {pending} "))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(kind_color(form.kind())));
    let inner = block.inner(area);

    let lines: Vec<Line> = form.fields().iter().map(|&field| field_line(form, field)).collect();
    f.render_widget(Paragraph::new(lines).block(block), area);

    // Cursor at the end of the focused text field
    let focused = form.focused_field();
    if focused != FormField::Type {
        if let Some(row) = form.fields().iter().position(|&field| field == focused) {
            let typed = form.input(focused).chars().count();
            if let Some((x, y)) = cursor_position(inner, row, typed) {
                f.set_cursor(x, y);
            }
        }
    }
}

fn field_line(form: &WorkoutForm, field: FormField) -> Line<'static> {
    let focused = form.focused_field() == field;
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::new().add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::Gray)
    };

    let value = match field {
        FormField::Type => Span::styled(
            format!("< {} >", form.kind().label()),
            Style::new().fg(kind_color(form.kind())),
        ),
        _ => {
            let typed = form.input(field);
            if typed.is_empty() && !focused {
                Span::styled(field_placeholder(field), Style::new().fg(Color::DarkGray))
            } else {
                Span::raw(typed.to_string())
            }
        }
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<LABEL_WIDTH$}", field_label(field)), label_style),
        value,
    ])
}

/// Cell after the typed text of the field on `row`, if it fits in `inner`.
fn cursor_position(inner: Rect, row: usize, typed: usize) -> Option<(u16, u16)> {
    let x = u16::try_from(2 + LABEL_WIDTH + typed)
        .map_or(u16::MAX, |dx| inner.x.saturating_add(dx));
    let y = u16::try_from(row).map_or(u16::MAX, |dy| inner.y.saturating_add(dy));
    (x < inner.right() && y < inner.bottom()).then_some((x, y))
}
