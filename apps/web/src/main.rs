mod dashboard;
mod fetch;
mod pulse;
mod render;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use chrono::NaiveDate;
use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    layout::Margin,
    style::{Color, Style},
    widgets::{Block, Borders},
    Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use tour_itinerary::{fetch_document, resolve_setlist, ContentTab, Language, MapScope};
use wasm_bindgen_futures::spawn_local;

use crate::dashboard::{Dashboard, Request};
use crate::fetch::{fetch_itinerary, fetch_text};

type Shared = Rc<RefCell<Dashboard>>;

/// The browser's local calendar day.
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    let year = i32::try_from(now.get_full_year()).unwrap_or(1970);
    NaiveDate::from_ymd_opt(year, now.get_month() + 1, now.get_date()).unwrap_or_default()
}

fn now_seconds() -> f64 {
    js_sys::Date::now() / 1000.0
}

fn browser_language() -> Language {
    web_sys::window()
        .and_then(|window| window.navigator().language())
        .filter(|lang| lang.to_ascii_lowercase().starts_with("en"))
        .map_or(Language::ZhCn, |_| Language::En)
}

fn debug(message: &str) {
    web_sys::console::debug_1(&message.into());
}

fn spawn_request(shared: &Shared, request: Request) {
    let shared = shared.clone();
    match request {
        Request::Setlist {
            token,
            stop,
            stop_index,
            dated_index,
        } => spawn_local(async move {
            let outcome = resolve_setlist(&stop, dated_index, fetch_text).await;
            if !shared.borrow_mut().apply_setlist(token, outcome) {
                debug(&format!("discarding stale setlist for stop {stop_index}"));
            }
        }),
        Request::Tab { token, tab } => spawn_local(async move {
            let outcome = fetch_document(tab.path(), fetch_text).await;
            if !shared.borrow_mut().apply_document(token, outcome) {
                debug(&format!("discarding stale {}", tab.path()));
            }
        }),
    }
}

fn handle_key(shared: &Shared, code: KeyCode, open_tab: &RefCell<Option<ContentTab>>) {
    let day = today();
    let request = {
        let mut dashboard = shared.borrow_mut();
        match code {
            KeyCode::Char('1') => {
                dashboard.switch_scope(MapScope::Domestic, day);
                *open_tab.borrow_mut() = None;
                None
            }
            KeyCode::Char('2') => {
                dashboard.switch_scope(MapScope::International, day);
                *open_tab.borrow_mut() = None;
                None
            }
            KeyCode::Char(c @ '3'..='6') => {
                let tab = match c {
                    '3' => ContentTab::Songlist,
                    '4' => ContentTab::Staffs,
                    '5' => ContentTab::Bonus,
                    _ => ContentTab::About,
                };
                *open_tab.borrow_mut() = Some(tab);
                Some(dashboard.open_tab(tab))
            }
            KeyCode::Left | KeyCode::Up => {
                dashboard.move_selection(false);
                None
            }
            KeyCode::Right | KeyCode::Down => {
                dashboard.move_selection(true);
                None
            }
            KeyCode::PageUp => {
                dashboard.scroll(false);
                None
            }
            KeyCode::PageDown => {
                dashboard.scroll(true);
                None
            }
            KeyCode::Enter => {
                *open_tab.borrow_mut() = None;
                dashboard.open_selected()
            }
            KeyCode::Char('l') => dashboard.toggle_language(day, *open_tab.borrow()),
            _ => None,
        }
    };

    if let Some(request) = request {
        spawn_request(shared, request);
    }
}

fn main() -> io::Result<()> {
    let shared: Shared = Rc::new(RefCell::new(Dashboard::new(browser_language(), today())));
    let open_tab = Rc::new(RefCell::new(None::<ContentTab>));

    spawn_local({
        let shared = shared.clone();
        async move {
            let result = fetch_itinerary().await;
            if let Err(reason) = &result {
                web_sys::console::error_1(&reason.as_str().into());
            }
            shared.borrow_mut().set_itinerary(result, today());
        }
    });

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let shared = shared.clone();
        move |event| handle_key(&shared, event.code, &open_tab)
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 0));
        f.render_widget(block, area);

        let mut dashboard = shared.borrow_mut();
        dashboard.tick(now_seconds(), today());
        render::render_dashboard(&dashboard, f, inner);
    });

    Ok(())
}
