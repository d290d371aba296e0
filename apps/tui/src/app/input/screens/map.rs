use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    let len = app.scene.points.len();
    match key {
        KeyCode::Left | KeyCode::Up => {
            app.cursor = wrap_decrement(app.cursor, len);
            app.status_message.clear();
        }
        KeyCode::Right | KeyCode::Down => {
            app.cursor = wrap_increment(app.cursor, len);
            app.status_message.clear();
        }
        KeyCode::Enter => app.tap_cursor(),
        _ => {}
    }
}

/// Picking one of several stops sharing a marker.
pub fn handle_choice_input(app: &mut App, key: KeyCode) {
    let len = app.dispatcher.pending().len();
    match key {
        KeyCode::Up => app.choice_index = wrap_decrement(app.choice_index, len),
        KeyCode::Down => app.choice_index = wrap_increment(app.choice_index, len),
        KeyCode::Enter => app.choose_candidate(),
        KeyCode::Esc => app.dispatcher.cancel(),
        _ => {}
    }
}
