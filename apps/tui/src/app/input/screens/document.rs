use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

const PAGE: u16 = 10;

pub fn handle_document_input(app: &mut App, key: KeyCode) {
    let open_lyric = {
        let Some(doc) = app.document.as_mut() else {
            return;
        };
        let links = doc.lyric_links.len();
        match key {
            KeyCode::Up => doc.scroll = doc.scroll.saturating_sub(1),
            KeyCode::Down => doc.scroll = doc.scroll.saturating_add(1),
            KeyCode::PageUp => doc.scroll = doc.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => doc.scroll = doc.scroll.saturating_add(PAGE),
            KeyCode::Home => doc.scroll = 0,
            KeyCode::Char('[') => doc.selected_link = wrap_decrement(doc.selected_link, links),
            KeyCode::Char(']') => doc.selected_link = wrap_increment(doc.selected_link, links),
            _ => {}
        }
        key == KeyCode::Enter && links > 0
    };

    if open_lyric {
        app.open_selected_lyric();
    }
}

pub fn handle_lyric_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Enter => {
            app.lyric = None;
            app.cancel_requests();
        }
        KeyCode::Up => {
            if let Some(popup) = app.lyric.as_mut() {
                popup.scroll = popup.scroll.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if let Some(popup) = app.lyric.as_mut() {
                popup.scroll = popup.scroll.saturating_add(1);
            }
        }
        _ => {}
    }
}
