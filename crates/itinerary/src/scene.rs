//! Declarative description of the itinerary map.
//!
//! A [`Scene`] is everything a charting surface needs to draw one map:
//! markers, the connecting path, highlighted regions and the camera. It is
//! rebuilt from the stop list on every render and never mutated.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date_range;
use crate::dedup::{spread_overlapping, CoordinateIndex, Placement};
use crate::i18n::Translator;
use crate::scope::MapScope;
use crate::status::{classify, StopStatus};
use crate::stop::{Coordinate, TourStop};
use crate::viewport::{estimate_viewport, ViewState};

pub const REGION_FILL: &str = "#BBDEFB";
pub const REGION_BORDER: &str = "#1976D2";
pub const PATH_COLOR: &str = "#2196F3";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePoint {
    /// Position of the stop in the full itinerary.
    pub stop_index: usize,
    pub name: String,
    pub date_text: String,
    pub city: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub status: StopStatus,
    pub color: &'static str,
    pub label: String,
    pub tooltip: Vec<String>,
}

impl ScenePoint {
    pub const fn coordinate(&self) -> Coordinate {
        self.placement.coordinate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathSegment {
    pub from_stop: usize,
    pub to_stop: usize,
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Province,
    Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionHighlight {
    pub name: String,
    pub kind: RegionKind,
    pub fill: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub scope: MapScope,
    pub base_map: &'static str,
    pub today: NaiveDate,
    pub points: Vec<ScenePoint>,
    pub path: Vec<PathSegment>,
    pub path_color: &'static str,
    pub regions: Vec<RegionHighlight>,
    pub viewport: ViewState,
    #[serde(skip)]
    index: CoordinateIndex,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions in `points` sharing the rounded original coordinate of the
    /// point at `position`.
    pub fn co_located(&self, position: usize) -> &[usize] {
        self.points
            .get(position)
            .map_or(&[], |point| self.index.members(point.placement.original))
    }
}

/// Builds the scene for `scope`. `today` must be computed once by the
/// caller so every stop is classified against the same day.
pub fn render_scene(
    stops: &[TourStop],
    scope: MapScope,
    today: NaiveDate,
    translator: &Translator,
) -> Scene {
    let visible: Vec<(usize, &TourStop)> = stops
        .iter()
        .enumerate()
        .filter(|(_, stop)| scope.includes(stop))
        .collect();

    let originals: Vec<Coordinate> = visible.iter().map(|(_, stop)| stop.coord).collect();
    let placements = spread_overlapping(&originals);

    let mut points = Vec::with_capacity(visible.len());
    let mut path = Vec::new();
    let mut previous_dated: Option<(usize, Coordinate)> = None;

    for (position, ((stop_index, stop), placement)) in visible.iter().zip(placements).enumerate() {
        let range = parse_date_range(&stop.date_text);
        let status = classify(stop.is_unannounced(), range, today);

        if range.is_some() {
            if let Some((from_stop, from)) = previous_dated {
                path.push(PathSegment {
                    from_stop,
                    to_stop: *stop_index,
                    from,
                    to: placement.coordinate,
                });
            }
            previous_dated = Some((*stop_index, placement.coordinate));
        }

        let ordinal = (position + 1).to_string();
        let label = translator.t_with(
            "map.stopLabel",
            &[("n", ordinal.as_str()), ("city", stop.city.as_str())],
        );
        let tooltip = vec![
            stop.name.clone(),
            stop.date_text.clone(),
            format!("{} {}", status.icon(), translator.t(status.label_key())),
        ];

        points.push(ScenePoint {
            stop_index: *stop_index,
            name: stop.name.clone(),
            date_text: stop.date_text.clone(),
            city: stop.city.clone(),
            placement,
            status,
            color: status.color(),
            label,
            tooltip,
        });
    }

    let regions = match scope {
        MapScope::Domestic => regions(
            visible.iter().filter_map(|(_, stop)| stop.province()),
            RegionKind::Province,
        ),
        MapScope::International => regions(
            stops.iter().map(|stop| stop.country.as_str()),
            RegionKind::Country,
        ),
    };

    Scene {
        scope,
        base_map: scope.as_str(),
        today,
        points,
        path,
        path_color: PATH_COLOR,
        regions,
        viewport: estimate_viewport(&originals, scope),
        index: CoordinateIndex::build(&originals),
    }
}

fn regions<'a>(names: impl Iterator<Item = &'a str>, kind: RegionKind) -> Vec<RegionHighlight> {
    let mut seen = HashSet::new();
    names
        .map(str::trim)
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(|name| RegionHighlight {
            name: name.to_string(),
            kind,
            fill: REGION_FILL,
            border: REGION_BORDER,
        })
        .collect()
}
