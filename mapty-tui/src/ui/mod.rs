// mapty-tui/src/ui/mod.rs
mod form;
mod layout;
mod map;
mod modals;
mod sidebar;
mod status_bar;

pub use layout::render_ui;
