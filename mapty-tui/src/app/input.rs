// mapty-tui/src/app/input.rs
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mapty_lib::{AppEvent, FormField};
use ratatui::layout::Rect;

use super::state::{ActiveModal, App};

/// Lines taken by one workout in the sidebar list.
pub const SIDEBAR_ROW_HEIGHT: u16 = 2;

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
            return Ok(());
        }

        // The open form takes the keyboard
        if self.controller.form().is_visible() {
            self.handle_form_input(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('R') => {
                if !self.controller.workouts().is_empty() {
                    self.active_modal = ActiveModal::ConfirmReset;
                }
            }
            KeyCode::Char('m') => self.reload_map(),
            KeyCode::Char('a') | KeyCode::Char(' ') => self.open_form_at_center(),
            KeyCode::Char('k') => self.sidebar_previous(),
            KeyCode::Char('j') => self.sidebar_next(),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Up => self.pan(0.0, 1.0),
            KeyCode::Down => self.pan(0.0, -1.0),
            KeyCode::Left => self.pan(-1.0, 0.0),
            KeyCode::Right => self.pan(1.0, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(true),
            KeyCode::Char('-') => self.zoom(false),
            _ => {}
        }
        Ok(())
    }

    fn handle_modal_input(&mut self, key: KeyEvent) {
        match &self.active_modal {
            ActiveModal::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?')
                ) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::Alert(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_reset(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.active_modal = ActiveModal::None;
                }
                _ => {}
            },
            ActiveModal::None => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        let on_type = self.controller.form().focused_field() == FormField::Type;
        match key.code {
            KeyCode::Esc => self.controller.handle_event(AppEvent::Cancel),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.controller.form_mut().focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.controller.form_mut().focus_previous(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if on_type => {
                self.controller.handle_event(AppEvent::ToggleType);
            }
            KeyCode::Backspace => self.controller.form_mut().backspace(),
            KeyCode::Char(c) => self.controller.form_mut().input_char(c),
            _ => {}
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.active_modal != ActiveModal::None {
            return Ok(());
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((x, y)) = local_position(self.map_area, column, row) {
                    let coords = self.map().and_then(|m| m.viewport.coords_at(x, y));
                    match coords {
                        Some(coords) => self.click_map(coords),
                        None => self.set_error("No map loaded, press m to retry".to_string()),
                    }
                } else if let Some(index) = sidebar_index(
                    self.sidebar_list_area,
                    self.sidebar_state.offset(),
                    column,
                    row,
                ) {
                    self.select_row(index);
                }
            }
            MouseEventKind::ScrollUp if local_position(self.map_area, column, row).is_some() => {
                self.zoom(true);
            }
            MouseEventKind::ScrollDown if local_position(self.map_area, column, row).is_some() => {
                self.zoom(false);
            }
            _ => {}
        }
        Ok(())
    }

    /// Keyboard stand-in for a click in the middle of the map.
    fn open_form_at_center(&mut self) {
        match self.map().map(|m| m.viewport.center) {
            Some(center) => self.click_map(center),
            None => self.set_error("No map loaded, press m to retry".to_string()),
        }
    }
}

/// Position of a cell relative to the top-left of `area`, if inside it.
fn local_position(area: Rect, column: u16, row: u16) -> Option<(u16, u16)> {
    let inside = column >= area.x && column < area.right() && row >= area.y && row < area.bottom();
    inside.then(|| (column - area.x, row - area.y))
}

/// Sidebar entry under a cell, given the list's scroll offset.
fn sidebar_index(list_area: Rect, offset: usize, column: u16, row: u16) -> Option<usize> {
    let (_, y) = local_position(list_area, column, row)?;
    Some(offset + usize::from(y / SIDEBAR_ROW_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_position_is_relative_to_area() {
        let area = Rect::new(2, 3, 10, 5);
        assert_eq!(local_position(area, 2, 3), Some((0, 0)));
        assert_eq!(local_position(area, 11, 7), Some((9, 4)));
        assert_eq!(local_position(area, 12, 7), None);
        assert_eq!(local_position(area, 1, 4), None);
    }

    #[test]
    fn sidebar_index_accounts_for_row_height_and_scroll() {
        let list = Rect::new(40, 10, 30, 20);
        assert_eq!(sidebar_index(list, 0, 45, 10), Some(0));
        assert_eq!(sidebar_index(list, 0, 45, 11), Some(0));
        assert_eq!(sidebar_index(list, 0, 45, 12), Some(1));
        assert_eq!(sidebar_index(list, 3, 45, 14), Some(5));
        assert_eq!(sidebar_index(list, 0, 10, 12), None);
    }
}
