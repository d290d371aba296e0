use sqlx::SqlitePool;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tour_itinerary::{
    fetch_document, resolve_setlist, ContentTab, DocumentOutcome, Language, LyricLink,
    RequestToken, SetlistOutcome, TourStop, Translator,
};
use tracing::{debug, warn};

use crate::content::ContentClient;
use crate::db::{save_preferences, Preferences};

/// Result of a background request.
#[derive(Debug)]
pub enum FetchResult {
    Tab {
        tab: ContentTab,
        outcome: DocumentOutcome,
    },
    Setlist {
        stop_index: usize,
        outcome: SetlistOutcome,
    },
    Lyric {
        link: LyricLink,
        outcome: DocumentOutcome,
    },
    Translator(Translator),
    /// The itinerary, or the reason it could not be loaded.
    Itinerary(Result<Vec<TourStop>, String>),
}

#[derive(Debug)]
pub struct AppEvent {
    pub token: RequestToken,
    pub result: FetchResult,
}

/// Spawns the I/O the UI needs and routes the results back to the event
/// loop through a channel.
#[derive(Debug)]
pub struct AppActions {
    client: ContentClient,
    tx: UnboundedSender<AppEvent>,
    pub db_pool: Option<SqlitePool>,
}

impl AppActions {
    pub fn new(client: ContentClient) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                client,
                tx,
                db_pool: None,
            },
            rx,
        )
    }

    fn spawn_fetch<F>(&self, token: RequestToken, task: F)
    where
        F: std::future::Future<Output = FetchResult> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = task.await;
            if tx.send(AppEvent { token, result }).is_err() {
                debug!(token = token.value(), "event loop gone, dropping result");
            }
        });
    }

    pub fn load_tab(&self, token: RequestToken, tab: ContentTab) {
        debug!(token = token.value(), path = tab.path(), "loading tab");
        let client = self.client.clone();
        self.spawn_fetch(token, async move {
            let outcome = fetch_document(tab.path(), |path| client.clone().fetch_owned(path)).await;
            FetchResult::Tab { tab, outcome }
        });
    }

    /// `dated_index` numbers the stop among dated stops for the fallback
    /// file name.
    pub fn load_setlist(
        &self,
        token: RequestToken,
        stop: TourStop,
        stop_index: usize,
        dated_index: usize,
    ) {
        debug!(token = token.value(), stop = %stop.name, "resolving setlist");
        let client = self.client.clone();
        self.spawn_fetch(token, async move {
            let outcome =
                resolve_setlist(&stop, dated_index, |path| client.clone().fetch_owned(path))
                    .await;
            FetchResult::Setlist {
                stop_index,
                outcome,
            }
        });
    }

    pub fn load_lyric(&self, token: RequestToken, link: LyricLink) {
        debug!(token = token.value(), file = %link.file, "loading lyric");
        let client = self.client.clone();
        self.spawn_fetch(token, async move {
            let outcome = fetch_document(&link.path(), |path| client.clone().fetch_owned(path)).await;
            FetchResult::Lyric { link, outcome }
        });
    }

    pub fn load_itinerary(&self, token: RequestToken) {
        let client = self.client.clone();
        self.spawn_fetch(token, async move {
            let result = client.load_itinerary().await.map_err(|e| {
                warn!(error = %e, "failed to load itinerary");
                e.to_string()
            });
            FetchResult::Itinerary(result)
        });
    }

    pub fn load_translator(&self, token: RequestToken, language: Language) {
        let client = self.client.clone();
        self.spawn_fetch(token, async move {
            FetchResult::Translator(client.load_translator(language).await)
        });
    }

    /// Stores the preferences in the background; failures are logged only.
    pub fn persist(&self, prefs: Preferences) {
        let Some(pool) = self.db_pool.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = save_preferences(&pool, &prefs).await {
                warn!(error = %e, "failed to save preferences");
            }
        });
    }
}
