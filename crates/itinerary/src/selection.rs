use serde::Serialize;

use crate::scene::{Scene, ScenePoint};
use crate::status::StopStatus;

/// A stop offered when several markers share one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub stop_index: usize,
    pub name: String,
    pub date_text: String,
    pub status: StopStatus,
}

impl Candidate {
    fn of(point: &ScenePoint) -> Self {
        Self {
            stop_index: point.stop_index,
            name: point.name.clone(),
            date_text: point.date_text.clone(),
            status: point.status,
        }
    }

    fn outcome(&self) -> SelectionOutcome {
        if self.status.has_date() {
            SelectionOutcome::Open(self.stop_index)
        } else {
            SelectionOutcome::NotAvailable(self.stop_index)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Open the setlist of this itinerary stop.
    Open(usize),
    /// The stop has no date yet; show a notice instead.
    NotAvailable(usize),
    /// Several stops share the location; the caller must pick one.
    Choose(Vec<Candidate>),
    Ignored,
}

/// Turns marker taps into navigation decisions. Holds the candidate list
/// between a [`SelectionOutcome::Choose`] and the following
/// [`Dispatcher::choose`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    pending: Vec<Candidate>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a tap on the point at `position` in `scene.points`.
    pub fn tap(&mut self, scene: &Scene, position: usize) -> SelectionOutcome {
        self.pending.clear();
        let candidates: Vec<Candidate> = scene
            .co_located(position)
            .iter()
            .filter_map(|&member| scene.points.get(member))
            .map(Candidate::of)
            .collect();

        match candidates.as_slice() {
            [] => SelectionOutcome::Ignored,
            [single] => single.outcome(),
            _ => {
                self.pending.clone_from(&candidates);
                SelectionOutcome::Choose(candidates)
            }
        }
    }

    /// Resolves a pending choice. Stops that were not offered are ignored.
    pub fn choose(&mut self, stop_index: usize) -> SelectionOutcome {
        let outcome = self
            .pending
            .iter()
            .find(|candidate| candidate.stop_index == stop_index)
            .map_or(SelectionOutcome::Ignored, Candidate::outcome);
        if outcome != SelectionOutcome::Ignored {
            self.pending.clear();
        }
        outcome
    }

    pub fn pending(&self) -> &[Candidate] {
        &self.pending
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::i18n::Translator;
    use crate::scene::render_scene;
    use crate::scope::MapScope;
    use crate::stop::TourStop;

    fn stop(name: &str, date: &str, coord: [f64; 2]) -> TourStop {
        TourStop {
            name: name.to_string(),
            date_text: date.to_string(),
            coord: coord.into(),
            country: "China".to_string(),
            province: None,
            city: name.to_string(),
            venue: String::new(),
            setlist_name: String::new(),
            announced: None,
        }
    }

    fn scene(stops: &[TourStop]) -> Scene {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
        render_scene(stops, MapScope::Domestic, today, &Translator::default())
    }

    #[test]
    fn single_dated_stop_opens() {
        let scene = scene(&[stop("成都", "2025-05-01", [104.07, 30.67])]);
        let mut dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.tap(&scene, 0), SelectionOutcome::Open(0));
        assert!(dispatcher.pending().is_empty());
    }

    #[test]
    fn single_pending_stop_is_not_available() {
        let scene = scene(&[
            stop("成都", "2025-05-01", [104.07, 30.67]),
            stop("重庆", "待定", [106.55, 29.56]),
        ]);
        let mut dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.tap(&scene, 1), SelectionOutcome::NotAvailable(1));
    }

    #[test]
    fn unknown_point_is_ignored() {
        let scene = scene(&[stop("成都", "2025-05-01", [104.07, 30.67])]);
        assert_eq!(Dispatcher::new().tap(&scene, 5), SelectionOutcome::Ignored);
    }

    #[test]
    fn shared_location_asks_for_a_choice() {
        let scene = scene(&[
            stop("北京 Day 1", "2025-06-01", [116.4, 39.9]),
            stop("北京 Day 2", "待定", [116.4, 39.9]),
            stop("上海", "2025-06-10", [121.47, 31.23]),
        ]);
        let mut dispatcher = Dispatcher::new();

        let SelectionOutcome::Choose(candidates) = dispatcher.tap(&scene, 1) else {
            panic!("expected a choice");
        };
        let offered: Vec<_> = candidates.iter().map(|c| c.stop_index).collect();
        assert_eq!(offered, vec![0, 1]);
        assert_eq!(dispatcher.pending().len(), 2);

        assert_eq!(dispatcher.choose(2), SelectionOutcome::Ignored);
        assert_eq!(dispatcher.choose(1), SelectionOutcome::NotAvailable(1));
        assert!(dispatcher.pending().is_empty());
        assert_eq!(dispatcher.choose(0), SelectionOutcome::Ignored);
    }

    #[test]
    fn a_new_tap_replaces_the_pending_choice() {
        let scene = scene(&[
            stop("北京 Day 1", "2025-06-01", [116.4, 39.9]),
            stop("北京 Day 2", "2025-06-02", [116.4, 39.9]),
            stop("上海", "2025-06-10", [121.47, 31.23]),
        ]);
        let mut dispatcher = Dispatcher::new();
        assert!(matches!(dispatcher.tap(&scene, 0), SelectionOutcome::Choose(_)));
        assert_eq!(dispatcher.tap(&scene, 2), SelectionOutcome::Open(2));
        assert!(dispatcher.pending().is_empty());
        assert_eq!(dispatcher.choose(0), SelectionOutcome::Ignored);
    }
}
