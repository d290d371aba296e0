use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_setlists_input(app: &mut App, key: KeyCode) {
    let len = app.browser.matches.len();
    match key {
        KeyCode::Up => app.browser.selected = wrap_decrement(app.browser.selected, len),
        KeyCode::Down => app.browser.selected = wrap_increment(app.browser.selected, len),
        KeyCode::Char('/') => app.browser.filtering = true,
        KeyCode::Enter => {
            if let Some(stop_index) = app.browser.selected_stop() {
                app.open_setlist(stop_index);
            }
        }
        _ => {}
    }
}

pub fn handle_filter_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.browser.filter.push(c),
        KeyCode::Backspace => {
            app.browser.filter.pop();
        }
        KeyCode::Enter => {
            app.browser.filtering = false;
            return;
        }
        KeyCode::Esc => {
            app.browser.filtering = false;
            app.browser.filter.clear();
        }
        _ => return,
    }
    app.browser.selected = 0;
    app.browser.refresh(&app.stops);
}
