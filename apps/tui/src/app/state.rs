use chrono::{Local, NaiveDate};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use throbber_widgets_tui::ThrobberState;
use tour_itinerary::{
    dated_position, html_blocks, Block, lyric_triggers, parse_date_range, parse_markdown, render_scene, ContentTab,
    Dispatcher, DocumentFormat, DocumentOutcome, Generation, Language, LyricLink, MapScope,
    RequestToken, Scene, SelectionOutcome, SetlistOutcome, TourStop, Translator,
};
use tracing::{debug, info};

use crate::app::actions::{AppActions, AppEvent, FetchResult};
use crate::db::Preferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    Setlists,
    Document,
}

/// What a document screen is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Tab(ContentTab),
    Setlist { stop_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    /// Localization key of the loading message.
    Loading(&'static str),
    Loaded(Vec<Block>),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub source: DocumentSource,
    pub body: DocumentBody,
    pub lyric_links: Vec<LyricLink>,
    pub selected_link: usize,
    pub scroll: u16,
}

impl DocumentView {
    const fn loading(source: DocumentSource, key: &'static str) -> Self {
        Self {
            source,
            body: DocumentBody::Loading(key),
            lyric_links: Vec::new(),
            selected_link: 0,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricPopup {
    pub link: LyricLink,
    pub body: DocumentBody,
    pub scroll: u16,
}

/// Dated stops of the itinerary, narrowed by a fuzzy filter.
#[derive(Debug, Default)]
pub struct SetlistBrowser {
    pub filter: String,
    pub filtering: bool,
    pub selected: usize,
    pub matches: Vec<usize>,
}

impl SetlistBrowser {
    pub fn refresh(&mut self, stops: &[TourStop]) {
        let matcher = SkimMatcherV2::default();
        let query = self.filter.trim();
        let mut scored: Vec<(i64, usize)> = stops
            .iter()
            .enumerate()
            .filter(|(_, stop)| parse_date_range(&stop.date_text).is_some())
            .filter_map(|(index, stop)| {
                if query.is_empty() {
                    return Some((0, index));
                }
                let haystack = format!("{} {} {}", stop.name, stop.city, stop.venue);
                matcher.fuzzy_match(&haystack, query).map(|score| (score, index))
            })
            .collect();
        if !query.is_empty() {
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        }
        self.matches = scored.into_iter().map(|(_, index)| index).collect();
        if self.selected >= self.matches.len() {
            self.selected = self.matches.len().saturating_sub(1);
        }
    }

    pub fn selected_stop(&self) -> Option<usize> {
        self.matches.get(self.selected).copied()
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub scope: MapScope,
    pub translator: Translator,
    pub today_override: Option<NaiveDate>,
    pub stops: Vec<TourStop>,
    pub scene: Scene,
    pub load_error: Option<String>,
    pub loading_itinerary: bool,
    pub cursor: usize,
    pub dispatcher: Dispatcher,
    pub choice_index: usize,
    pub status_message: String,
    pub document: Option<DocumentView>,
    pub lyric: Option<LyricPopup>,
    pub browser: SetlistBrowser,
    pub generation: Generation,
    pub in_flight: Option<RequestToken>,
    pub throbber: ThrobberState,
    pub actions: AppActions,
}

impl App {
    pub fn new(actions: AppActions, language: Language, scope: MapScope) -> Self {
        let translator = Translator::new(language);
        let today = Local::now().date_naive();
        let scene = render_scene(&[], scope, today, &translator);
        Self {
            running: true,
            screen: AppScreen::Map,
            show_help: false,
            scope,
            translator,
            today_override: None,
            stops: Vec::new(),
            scene,
            load_error: None,
            loading_itinerary: false,
            cursor: 0,
            dispatcher: Dispatcher::new(),
            choice_index: 0,
            status_message: String::new(),
            document: None,
            lyric: None,
            browser: SetlistBrowser::default(),
            generation: Generation::new(),
            in_flight: None,
            throbber: ThrobberState::default(),
            actions,
        }
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translator.t(key)
    }

    pub fn language(&self) -> Language {
        self.translator.language()
    }

    /// The day stops are classified against, computed once per render.
    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Requests the itinerary and the translation overrides of the current
    /// language.
    pub fn start(&mut self) {
        self.loading_itinerary = true;
        let token = self.generation.token();
        self.actions.load_itinerary(token);
        self.actions.load_translator(token, self.language());
    }

    pub fn set_stops(&mut self, stops: Vec<TourStop>) {
        info!(count = stops.len(), "itinerary loaded");
        self.stops = stops;
        self.load_error = None;
        self.browser.refresh(&self.stops);
        self.refresh_scene();
    }

    pub fn refresh_scene(&mut self) {
        self.scene = render_scene(&self.stops, self.scope, self.today(), &self.translator);
        if self.cursor >= self.scene.points.len() {
            self.cursor = 0;
        }
    }

    /// Advances the spinner and re-renders when the date rolled over.
    pub fn update(&mut self) {
        if self.in_flight.is_some() || self.loading_itinerary {
            self.throbber.calc_next();
        }
        if self.scene.today != self.today() {
            self.refresh_scene();
        }
    }

    pub const fn preferences(&self) -> Preferences {
        Preferences {
            language: Some(self.translator.language()),
            scope: Some(self.scope),
        }
    }

    fn begin_request(&mut self) -> RequestToken {
        let token = self.generation.next();
        self.in_flight = Some(token);
        token
    }

    /// Invalidates outstanding requests without starting a new one.
    pub fn cancel_requests(&mut self) {
        self.generation.next();
        self.in_flight = None;
    }

    pub fn switch_scope(&mut self, scope: MapScope) {
        self.cancel_requests();
        self.dispatcher.cancel();
        self.document = None;
        self.lyric = None;
        self.screen = AppScreen::Map;
        self.status_message.clear();
        if self.scope != scope {
            debug!(scope = scope.as_str(), "switching map scope");
            self.scope = scope;
            self.cursor = 0;
            self.refresh_scene();
            self.actions.persist(self.preferences());
        }
    }

    pub fn toggle_language(&mut self) {
        let language = self.language().toggled();
        info!(language = language.as_str(), "switching language");
        self.translator = Translator::new(language);
        self.refresh_scene();
        self.actions.persist(self.preferences());
        // Overrides arrive later; they are not tied to a screen.
        self.actions.load_translator(self.generation.token(), language);
        self.reload_document();
    }

    pub fn apply_translator(&mut self, translator: Translator) {
        if translator.language() == self.language() {
            self.translator = translator;
            self.refresh_scene();
        }
    }

    pub fn open_tab(&mut self, tab: ContentTab) {
        let token = self.begin_request();
        self.dispatcher.cancel();
        self.lyric = None;
        self.status_message.clear();
        self.document = Some(DocumentView::loading(DocumentSource::Tab(tab), tab.loading_key()));
        self.screen = AppScreen::Document;
        self.actions.load_tab(token, tab);
    }

    pub fn open_setlist(&mut self, stop_index: usize) {
        let Some(stop) = self.stops.get(stop_index).cloned() else {
            return;
        };
        let Some(dated_index) = dated_position(&self.stops, stop_index) else {
            self.status_message = self.t("map.notAvailable").to_string();
            return;
        };
        let token = self.begin_request();
        self.dispatcher.cancel();
        self.lyric = None;
        self.status_message.clear();
        self.document = Some(DocumentView::loading(
            DocumentSource::Setlist { stop_index },
            "loading.setlist.songs",
        ));
        self.screen = AppScreen::Document;
        self.actions.load_setlist(token, stop, stop_index, dated_index);
    }

    pub fn open_setlist_browser(&mut self) {
        self.cancel_requests();
        self.dispatcher.cancel();
        self.document = None;
        self.lyric = None;
        self.browser.refresh(&self.stops);
        self.screen = AppScreen::Setlists;
    }

    fn reload_document(&mut self) {
        match self.document.as_ref().map(|doc| doc.source.clone()) {
            Some(DocumentSource::Tab(tab)) => self.open_tab(tab),
            Some(DocumentSource::Setlist { stop_index }) => self.open_setlist(stop_index),
            None => {}
        }
    }

    pub fn open_selected_lyric(&mut self) {
        let Some(link) = self
            .document
            .as_ref()
            .and_then(|doc| doc.lyric_links.get(doc.selected_link).cloned())
        else {
            return;
        };
        let token = self.begin_request();
        self.lyric = Some(LyricPopup {
            link: link.clone(),
            body: DocumentBody::Loading("loading.lyric"),
            scroll: 0,
        });
        self.actions.load_lyric(token, link);
    }

    /// Taps the marker under the cursor.
    pub fn tap_cursor(&mut self) {
        let outcome = self.dispatcher.tap(&self.scene, self.cursor);
        self.apply_selection(outcome);
    }

    pub fn choose_candidate(&mut self) {
        let Some(stop_index) = self
            .dispatcher
            .pending()
            .get(self.choice_index)
            .map(|candidate| candidate.stop_index)
        else {
            return;
        };
        let outcome = self.dispatcher.choose(stop_index);
        self.apply_selection(outcome);
    }

    fn apply_selection(&mut self, outcome: SelectionOutcome) {
        debug!(?outcome, "marker selection");
        match outcome {
            SelectionOutcome::Open(stop_index) => self.open_setlist(stop_index),
            SelectionOutcome::NotAvailable(_) => {
                self.status_message = self.t("map.notAvailable").to_string();
            }
            SelectionOutcome::Choose(_) => {
                self.choice_index = 0;
                self.status_message.clear();
            }
            SelectionOutcome::Ignored => {}
        }
    }

    /// Applies a background result unless the user has moved on since the
    /// request was made.
    pub fn handle_event(&mut self, event: AppEvent) {
        // Neither is tied to what the user is looking at.
        let result = match event.result {
            FetchResult::Translator(translator) => {
                self.apply_translator(translator);
                return;
            }
            FetchResult::Itinerary(Ok(stops)) => {
                self.loading_itinerary = false;
                self.set_stops(stops);
                return;
            }
            FetchResult::Itinerary(Err(reason)) => {
                self.loading_itinerary = false;
                self.load_error = Some(reason);
                return;
            }
            other => other,
        };

        if !self.generation.is_current(event.token) {
            debug!(token = event.token.value(), "discarding stale result");
            return;
        }
        self.in_flight = None;

        match result {
            FetchResult::Tab { outcome, .. } => {
                let body = self.document_body(outcome, DocumentFormat::Markdown);
                self.set_document_body(body.0, body.1);
            }
            FetchResult::Setlist { stop_index, outcome } => {
                let (body, links) = self.setlist_body(stop_index, outcome);
                self.set_document_body(body, links);
            }
            FetchResult::Lyric { link, outcome } => {
                let body = match outcome {
                    DocumentOutcome::Loaded(text) => DocumentBody::Loaded(parse_markdown(&text)),
                    DocumentOutcome::NotFound | DocumentOutcome::Unreachable(_) => {
                        DocumentBody::Message(
                            self.translator.t_with("error.lyric", &[("file", link.file.as_str())]),
                        )
                    }
                };
                if let Some(popup) = self.lyric.as_mut() {
                    popup.body = body;
                }
            }
            FetchResult::Translator(_) | FetchResult::Itinerary(_) => {}
        }
    }

    fn set_document_body(&mut self, body: DocumentBody, links: Vec<LyricLink>) {
        if let Some(doc) = self.document.as_mut() {
            doc.body = body;
            doc.lyric_links = links;
            doc.selected_link = 0;
            doc.scroll = 0;
        }
    }

    fn document_body(
        &self,
        outcome: DocumentOutcome,
        format: DocumentFormat,
    ) -> (DocumentBody, Vec<LyricLink>) {
        match outcome {
            DocumentOutcome::Loaded(text) => parsed_document(&text, format),
            DocumentOutcome::NotFound => (
                DocumentBody::Message(self.t("error.notFound").to_string()),
                Vec::new(),
            ),
            DocumentOutcome::Unreachable(err) => {
                debug!(error = %err, "document unreachable");
                (
                    DocumentBody::Message(self.t("error.loadFailed").to_string()),
                    Vec::new(),
                )
            }
        }
    }

    fn setlist_body(
        &self,
        stop_index: usize,
        outcome: SetlistOutcome,
    ) -> (DocumentBody, Vec<LyricLink>) {
        match outcome {
            SetlistOutcome::Document { format, body, path } => {
                debug!(stop_index, %path, "setlist resolved");
                parsed_document(&body, format)
            }
            SetlistOutcome::Unpublished { unannounced, stem } => {
                let message = if unannounced {
                    self.t("setlist.unofficial").to_string()
                } else {
                    self.translator
                        .t_with("setlist.fileNotPublished", &[("stem", stem.as_str())])
                };
                (DocumentBody::Message(message), Vec::new())
            }
            SetlistOutcome::Unreachable(err) => {
                debug!(error = %err, "setlist unreachable");
                (
                    DocumentBody::Message(self.t("error.setlist.loadFailed").to_string()),
                    Vec::new(),
                )
            }
        }
    }

    pub fn document_title(&self) -> String {
        match self.document.as_ref().map(|doc| &doc.source) {
            Some(DocumentSource::Tab(tab)) => self.t(tab.label_key()).to_string(),
            Some(DocumentSource::Setlist { stop_index }) => self
                .stops
                .get(*stop_index)
                .map_or_else(String::new, |stop| stop.name.clone()),
            None => String::new(),
        }
    }
}

fn parsed_document(text: &str, format: DocumentFormat) -> (DocumentBody, Vec<LyricLink>) {
    let links = lyric_triggers(text);
    let blocks = match format {
        DocumentFormat::Markdown => parse_markdown(text),
        DocumentFormat::Html => html_blocks(text),
    };
    (DocumentBody::Loaded(blocks), links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataRoot;
    use crate::content::ContentClient;
    use tour_itinerary::{parse_itinerary, FetchError};

    const ITINERARY: &str = r#"[
        {"name": "北京站 Day 1", "date": "2025-06-01", "coord": [116.4, 39.9], "country": "China", "city": "北京", "location": "鸟巢", "setlist-name": "beijing-1"},
        {"name": "北京站 Day 2", "date": "待定", "coord": [116.4, 39.9], "country": "China", "city": "北京", "location": "鸟巢"},
        {"name": "上海站", "date": "2025-06-10", "coord": [121.47, 31.23], "country": "China", "city": "上海", "location": "梅奔"},
        {"name": "Singapore", "date": "2025-07-01", "coord": [103.8, 1.35], "country": "Singapore", "city": "Singapore", "location": "Stadium"}
    ]"#;

    fn test_app() -> Result<App, Box<dyn std::error::Error>> {
        let client = ContentClient::new(&DataRoot::Dir("./missing-data".into()), 1)?;
        let (actions, _rx) = AppActions::new(client);
        let mut app = App::new(actions, Language::En, MapScope::Domestic);
        app.today_override = NaiveDate::from_ymd_opt(2025, 6, 1);
        app.set_stops(parse_itinerary(ITINERARY)?);
        Ok(app)
    }

    #[tokio::test]
    async fn scope_switch_rebuilds_scene() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        assert_eq!(app.scene.points.len(), 3);
        app.switch_scope(MapScope::International);
        assert_eq!(app.scene.points.len(), 4);
        assert_eq!(app.scene.base_map, "world");
        Ok(())
    }

    #[tokio::test]
    async fn stale_results_are_discarded() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        app.open_tab(ContentTab::About);
        let stale = app.generation.token();
        app.open_tab(ContentTab::Bonus);
        let current = app.generation.token();

        app.handle_event(AppEvent {
            token: stale,
            result: FetchResult::Tab {
                tab: ContentTab::About,
                outcome: DocumentOutcome::Loaded("# About".to_string()),
            },
        });
        let doc = app.document.as_ref().ok_or("no document")?;
        assert_eq!(doc.source, DocumentSource::Tab(ContentTab::Bonus));
        assert_eq!(doc.body, DocumentBody::Loading("loading.bonus"));

        app.handle_event(AppEvent {
            token: current,
            result: FetchResult::Tab {
                tab: ContentTab::Bonus,
                outcome: DocumentOutcome::NotFound,
            },
        });
        let doc = app.document.as_ref().ok_or("no document")?;
        assert_eq!(
            doc.body,
            DocumentBody::Message("This content has not been published yet".to_string())
        );
        assert!(app.in_flight.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn scope_switch_invalidates_pending_document() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        app.open_setlist(0);
        let token = app.generation.token();
        app.switch_scope(MapScope::International);
        app.handle_event(AppEvent {
            token,
            result: FetchResult::Setlist {
                stop_index: 0,
                outcome: SetlistOutcome::Unreachable(FetchError::new("setlist/x.html", "down")),
            },
        });
        assert!(app.document.is_none());
        assert_eq!(app.screen, AppScreen::Map);
        Ok(())
    }

    #[tokio::test]
    async fn shared_marker_asks_then_reports_pending() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        app.cursor = 0;
        app.tap_cursor();
        assert_eq!(app.dispatcher.pending().len(), 2);

        app.choice_index = 1;
        app.choose_candidate();
        assert!(app.dispatcher.pending().is_empty());
        assert_eq!(app.status_message, app.t("map.notAvailable"));
        assert_eq!(app.screen, AppScreen::Map);
        Ok(())
    }

    #[tokio::test]
    async fn unpublished_setlist_message() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        app.open_setlist(2);
        let token = app.generation.token();
        app.handle_event(AppEvent {
            token,
            result: FetchResult::Setlist {
                stop_index: 2,
                outcome: SetlistOutcome::Unpublished {
                    unannounced: true,
                    stem: "_02_上海".to_string(),
                },
            },
        });
        let doc = app.document.as_ref().ok_or("no document")?;
        assert_eq!(
            doc.body,
            DocumentBody::Message(app.t("setlist.unofficial").to_string())
        );
        assert_eq!(app.document_title(), "上海站");
        Ok(())
    }

    #[tokio::test]
    async fn undated_stop_has_no_setlist() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        let before = app.generation.token();
        app.open_setlist(1);
        assert!(app.document.is_none());
        assert_eq!(app.screen, AppScreen::Map);
        assert_eq!(app.status_message, app.t("map.notAvailable"));
        assert_eq!(app.generation.token(), before);
        Ok(())
    }

    #[tokio::test]
    async fn html_setlist_exposes_lyric_links() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        app.open_setlist(0);
        let token = app.generation.token();
        app.handle_event(AppEvent {
            token,
            result: FetchResult::Setlist {
                stop_index: 0,
                outcome: SetlistOutcome::Document {
                    format: DocumentFormat::Html,
                    path: "setlist/beijing-1.html".to_string(),
                    body: r#"<ol><li><span class="lyric-trigger" data-lyric-file="one.md">One</span></li></ol>"#
                        .to_string(),
                },
            },
        });
        let doc = app.document.as_ref().ok_or("no document")?;
        assert_eq!(doc.lyric_links.len(), 1);
        assert!(matches!(doc.body, DocumentBody::Loaded(ref blocks) if !blocks.is_empty()));
        Ok(())
    }

    #[test]
    fn browser_lists_dated_stops_and_filters() {
        let stops = parse_itinerary(ITINERARY).unwrap_or_default();
        let mut browser = SetlistBrowser::default();
        browser.refresh(&stops);
        assert_eq!(browser.matches, vec![0, 2, 3]);

        browser.filter = "sing".to_string();
        browser.selected = 2;
        browser.refresh(&stops);
        assert_eq!(browser.matches, vec![3]);
        assert_eq!(browser.selected_stop(), Some(3));
    }

    #[tokio::test]
    async fn itinerary_results_ignore_generation() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = test_app()?;
        let token = app.generation.token();
        app.open_tab(ContentTab::About);
        app.loading_itinerary = true;

        app.handle_event(AppEvent {
            token,
            result: FetchResult::Itinerary(Err("itinerary.json missing".to_string())),
        });
        assert!(!app.loading_itinerary);
        assert_eq!(app.load_error.as_deref(), Some("itinerary.json missing"));

        app.handle_event(AppEvent {
            token,
            result: FetchResult::Itinerary(parse_itinerary(ITINERARY).map_err(|e| e.to_string())),
        });
        assert!(app.load_error.is_none());
        assert_eq!(app.stops.len(), 4);
        Ok(())
    }
}
