use serde::Serialize;

use crate::stop::{Coordinate, TourStop};

/// The active map mode. Selects which stops are shown and which base map
/// they are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MapScope {
    #[default]
    #[serde(rename = "china")]
    Domestic,
    #[serde(rename = "world")]
    International,
}

/// Camera limits of one scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeCamera {
    pub fallback_center: Coordinate,
    pub fallback_zoom: f64,
    pub city_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl MapScope {
    pub const ALL: [Self; 2] = [Self::Domestic, Self::International];

    /// Base map identifier, also used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "china",
            Self::International => "world",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "china" | "domestic" => Some(Self::Domestic),
            "world" | "international" => Some(Self::International),
            _ => None,
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Domestic => "nav.china",
            Self::International => "nav.world",
        }
    }

    pub fn includes(self, stop: &TourStop) -> bool {
        match self {
            Self::Domestic => stop.is_domestic(),
            Self::International => true,
        }
    }

    pub const fn camera(self) -> ScopeCamera {
        match self {
            Self::Domestic => ScopeCamera {
                fallback_center: Coordinate::new(104.0, 35.0),
                fallback_zoom: 2.5,
                city_zoom: 7.0,
                min_zoom: 2.5,
                max_zoom: 8.0,
            },
            Self::International => ScopeCamera {
                fallback_center: Coordinate::new(110.0, 20.0),
                fallback_zoom: 1.0,
                city_zoom: 5.0,
                min_zoom: 1.0,
                max_zoom: 6.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_map_names_and_aliases() {
        assert_eq!(MapScope::parse("China"), Some(MapScope::Domestic));
        assert_eq!(MapScope::parse(" world "), Some(MapScope::International));
        assert_eq!(MapScope::parse("domestic"), Some(MapScope::Domestic));
        assert_eq!(MapScope::parse("moon"), None);
        for scope in MapScope::ALL {
            assert_eq!(MapScope::parse(scope.as_str()), Some(scope));
        }
    }

    #[test]
    fn domestic_allows_tighter_zoom() {
        let domestic = MapScope::Domestic.camera();
        let world = MapScope::International.camera();
        assert!(domestic.max_zoom > world.max_zoom);
        for camera in [domestic, world] {
            assert!(camera.min_zoom <= camera.fallback_zoom);
            assert!(camera.city_zoom <= camera.max_zoom);
        }
    }
}
