use chrono::NaiveDate;
use tour_itinerary::{
    dated_position, html_blocks, parse_markdown, render_scene, Block, ContentTab, DocumentFormat,
    DocumentOutcome, Generation, Language, MapScope, RequestToken, Scene, SetlistOutcome,
    TourStop, Translator,
};

use crate::pulse::{advance_pulse, PulseMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneBody {
    Idle,
    /// Localization key of the loading message.
    Loading(&'static str),
    Blocks(Vec<Block>),
    Message(String),
}

/// The content pane beside the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub title: String,
    pub body: PaneBody,
    pub scroll: u16,
}

impl Pane {
    const fn idle() -> Self {
        Self {
            title: String::new(),
            body: PaneBody::Idle,
            scroll: 0,
        }
    }
}

/// A request the caller has to start; the dashboard only tracks it.
#[derive(Debug, Clone)]
pub enum Request {
    Setlist {
        token: RequestToken,
        stop: TourStop,
        stop_index: usize,
        dated_index: usize,
    },
    Tab {
        token: RequestToken,
        tab: ContentTab,
    },
}

#[derive(Debug)]
pub struct Dashboard {
    pub stops: Vec<TourStop>,
    pub load_error: Option<String>,
    pub loaded: bool,
    pub scope: MapScope,
    pub translator: Translator,
    pub scene: Scene,
    pub selected: usize,
    pub pane: Pane,
    pub generation: Generation,
    pub in_flight: bool,
    pub phase: f64,
    pub last_tick: Option<f64>,
}

impl Dashboard {
    pub fn new(language: Language, today: NaiveDate) -> Self {
        let translator = Translator::new(language);
        let scope = MapScope::default();
        Self {
            scene: render_scene(&[], scope, today, &translator),
            stops: Vec::new(),
            load_error: None,
            loaded: false,
            scope,
            translator,
            selected: 0,
            pane: Pane::idle(),
            generation: Generation::new(),
            in_flight: false,
            phase: 0.0,
            last_tick: None,
        }
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translator.t(key)
    }

    pub fn set_itinerary(&mut self, result: Result<Vec<TourStop>, String>, today: NaiveDate) {
        self.loaded = true;
        match result {
            Ok(stops) => {
                self.stops = stops;
                self.load_error = None;
            }
            Err(reason) => self.load_error = Some(reason),
        }
        self.refresh(today);
    }

    /// Rebuilds the scene for `today`.
    pub fn refresh(&mut self, today: NaiveDate) {
        self.scene = render_scene(&self.stops, self.scope, today, &self.translator);
        if self.selected >= self.scene.points.len() {
            self.selected = 0;
        }
    }

    /// Called once per frame.
    pub fn tick(&mut self, now_seconds: f64, today: NaiveDate) {
        (self.phase, self.last_tick) =
            advance_pulse(self.phase, self.last_tick, now_seconds, PulseMode::Running);
        if self.scene.today != today {
            self.refresh(today);
        }
    }

    pub fn switch_scope(&mut self, scope: MapScope, today: NaiveDate) {
        self.generation.next();
        self.in_flight = false;
        self.pane = Pane::idle();
        if self.scope != scope {
            self.scope = scope;
            self.selected = 0;
            self.refresh(today);
        }
    }

    pub fn move_selection(&mut self, forward: bool) {
        let len = self.scene.points.len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    pub fn scroll(&mut self, down: bool) {
        self.pane.scroll = if down {
            self.pane.scroll.saturating_add(1)
        } else {
            self.pane.scroll.saturating_sub(1)
        };
    }

    /// Starts loading the setlist of the selected stop, or explains why there
    /// is none.
    pub fn open_selected(&mut self) -> Option<Request> {
        let point = self.scene.points.get(self.selected)?;
        let stop_index = point.stop_index;
        let title = point.name.clone();
        let dated_index = if point.status.has_date() {
            dated_position(&self.stops, stop_index)
        } else {
            None
        };
        let Some(dated_index) = dated_index else {
            self.pane = Pane {
                title,
                body: PaneBody::Message(self.t("map.notAvailable").to_string()),
                scroll: 0,
            };
            return None;
        };

        let stop = self.stops.get(stop_index)?.clone();
        let token = self.begin(title, "loading.setlist.songs");
        Some(Request::Setlist {
            token,
            stop,
            stop_index,
            dated_index,
        })
    }

    pub fn open_tab(&mut self, tab: ContentTab) -> Request {
        let title = self.t(tab.label_key()).to_string();
        let token = self.begin(title, tab.loading_key());
        Request::Tab { token, tab }
    }

    fn begin(&mut self, title: String, loading_key: &'static str) -> RequestToken {
        let token = self.generation.next();
        self.in_flight = true;
        self.pane = Pane {
            title,
            body: PaneBody::Loading(loading_key),
            scroll: 0,
        };
        token
    }

    /// Switches language and returns the request that reloads the open
    /// tab, if any.
    pub fn toggle_language(&mut self, today: NaiveDate, open_tab: Option<ContentTab>) -> Option<Request> {
        self.translator = Translator::new(self.translator.language().toggled());
        self.refresh(today);
        open_tab.map(|tab| self.open_tab(tab))
    }

    /// Returns `false` when the result is stale and was dropped.
    pub fn apply_document(&mut self, token: RequestToken, outcome: DocumentOutcome) -> bool {
        if !self.accept(token) {
            return false;
        }
        self.pane.body = match outcome {
            DocumentOutcome::Loaded(text) => PaneBody::Blocks(parse_markdown(&text)),
            DocumentOutcome::NotFound => PaneBody::Message(self.t("error.notFound").to_string()),
            DocumentOutcome::Unreachable(_) => {
                PaneBody::Message(self.t("error.loadFailed").to_string())
            }
        };
        true
    }

    pub fn apply_setlist(&mut self, token: RequestToken, outcome: SetlistOutcome) -> bool {
        if !self.accept(token) {
            return false;
        }
        self.pane.body = match outcome {
            SetlistOutcome::Document { format, body, .. } => PaneBody::Blocks(match format {
                DocumentFormat::Markdown => parse_markdown(&body),
                DocumentFormat::Html => html_blocks(&body),
            }),
            SetlistOutcome::Unpublished { unannounced: true, .. } => {
                PaneBody::Message(self.t("setlist.unofficial").to_string())
            }
            SetlistOutcome::Unpublished { stem, .. } => PaneBody::Message(
                self.translator
                    .t_with("setlist.fileNotPublished", &[("stem", stem.as_str())]),
            ),
            SetlistOutcome::Unreachable(_) => {
                PaneBody::Message(self.t("error.setlist.loadFailed").to_string())
            }
        };
        true
    }

    fn accept(&mut self, token: RequestToken) -> bool {
        if !self.generation.is_current(token) {
            return false;
        }
        self.in_flight = false;
        true
    }
}
