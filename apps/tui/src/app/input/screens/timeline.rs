use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_timeline_input(app: &mut App, key: KeyCode) {
    let len = app.timeline.len();

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.timeline_index = wrap_decrement(app.timeline_index, len);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.timeline_index = wrap_increment(app.timeline_index, len);
        }
        KeyCode::Home => app.timeline_index = 0,
        KeyCode::End => app.timeline_index = len.saturating_sub(1),
        KeyCode::Esc => app.next_tab(false),
        _ => {}
    }
}
