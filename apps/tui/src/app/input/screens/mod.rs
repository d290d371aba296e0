use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use tour_itinerary::{ContentTab, MapScope};

mod document;
mod help;
mod map;
mod setlists;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    let typing = app.screen == AppScreen::Setlists && app.browser.filtering;
    if !typing && help::handle_help_toggle(app, key) {
        return;
    }

    if app.lyric.is_some() {
        document::handle_lyric_input(app, key);
        return;
    }

    if !app.dispatcher.pending().is_empty() {
        map::handle_choice_input(app, key);
        return;
    }

    if typing {
        setlists::handle_filter_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::Setlists => setlists::handle_setlists_input(app, key),
        AppScreen::Document => document::handle_document_input(app, key),
    }
}

/// Navigation keys that work on every screen.
fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('1') => app.switch_scope(MapScope::Domestic),
        KeyCode::Char('2') => app.switch_scope(MapScope::International),
        KeyCode::Char('3') => app.open_tab(ContentTab::Songlist),
        KeyCode::Char('4') => app.open_setlist_browser(),
        KeyCode::Char('5') => app.open_tab(ContentTab::Staffs),
        KeyCode::Char('6') => app.open_tab(ContentTab::Bonus),
        KeyCode::Char('7') => app.open_tab(ContentTab::About),
        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Esc if app.screen != AppScreen::Map => {
            let scope = app.scope;
            app.switch_scope(scope);
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::AppActions;
    use crate::config::DataRoot;
    use crate::content::ContentClient;
    use chrono::NaiveDate;
    use tour_itinerary::{parse_itinerary, Language};

    const ITINERARY: &str = r#"[
        {"name": "广州站", "date": "2025-05-01", "coord": [113.26, 23.13], "country": "China", "city": "广州", "location": "体育馆"},
        {"name": "深圳站", "date": "2025-05-08", "coord": [114.06, 22.54], "country": "China", "city": "深圳", "location": "湾体"},
        {"name": "Tokyo", "date": "2025-07-01", "coord": [139.7, 35.7], "country": "Japan", "city": "Tokyo", "location": "Budokan"}
    ]"#;

    fn test_app() -> Result<App, Box<dyn std::error::Error>> {
        let client = ContentClient::new(&DataRoot::Dir("./missing-data".into()), 1)?;
        let (actions, _rx) = AppActions::new(client);
        let mut app = App::new(actions, Language::ZhCn, MapScope::Domestic);
        app.today_override = NaiveDate::from_ymd_opt(2025, 5, 8);
        app.set_stops(parse_itinerary(ITINERARY)?);
        Ok(app)
    }

    #[tokio::test]
    async fn number_keys_switch_screens() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        dispatch_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.scope, MapScope::International);
        assert_eq!(app.scene.points.len(), 3);

        dispatch_input(&mut app, KeyCode::Char('7'));
        assert_eq!(app.screen, AppScreen::Document);

        dispatch_input(&mut app, KeyCode::Char('4'));
        assert_eq!(app.screen, AppScreen::Setlists);
        assert!(app.document.is_none());

        dispatch_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Map);
        assert_eq!(app.scope, MapScope::International);
        Ok(())
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        dispatch_input(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
        Ok(())
    }

    #[tokio::test]
    async fn map_cursor_wraps_and_opens_setlist() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        dispatch_input(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, 1);
        dispatch_input(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, 0);

        dispatch_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Document);
        assert_eq!(app.document_title(), "广州站");
        Ok(())
    }

    #[tokio::test]
    async fn filter_typing_does_not_trigger_shortcuts() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        dispatch_input(&mut app, KeyCode::Char('4'));
        dispatch_input(&mut app, KeyCode::Char('/'));
        assert!(app.browser.filtering);

        for ch in "tokyo".chars() {
            dispatch_input(&mut app, KeyCode::Char(ch));
        }
        assert!(app.running);
        assert_eq!(app.browser.filter, "tokyo");
        assert_eq!(app.browser.matches, vec![2]);

        dispatch_input(&mut app, KeyCode::Enter);
        assert!(!app.browser.filtering);
        dispatch_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Document);
        assert_eq!(app.document_title(), "Tokyo");
        Ok(())
    }

    #[tokio::test]
    async fn language_toggle_relabels_scene() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        assert_eq!(app.scene.points[0].label, "第1站：广州");
        dispatch_input(&mut app, KeyCode::Char('l'));
        assert_eq!(app.language(), Language::En);
        assert_eq!(app.scene.points[0].label, "Stop 1: 广州");
        Ok(())
    }
}
