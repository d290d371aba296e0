use serde::{Deserialize, Serialize};

use crate::error::ItineraryError;

/// Markers that flag a stop as not officially announced when embedded in
/// its display name.
pub const UNANNOUNCED_MARKERS: [&str; 2] = ["未官宣", "测试"];

/// Marker appended to a city when the show has not been announced yet.
pub const CITY_UNANNOUNCED_MARKER: &str = "（未官宣）";

const ASCII_UNANNOUNCED_MARKER: &str = "unannounced";

/// Country value that places a stop on the domestic map.
pub const DOMESTIC_COUNTRY: &str = "China";

/// A `(longitude, latitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lng, coord.lat]
    }
}

/// One show of the tour, as published in `itinerary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStop {
    pub name: String,
    #[serde(rename = "date", default)]
    pub date_text: String,
    pub coord: Coordinate,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "location", default)]
    pub venue: String,
    #[serde(rename = "setlist-name", default)]
    pub setlist_name: String,
    /// Explicit announcement flag. Records without it fall back to the
    /// name markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announced: Option<bool>,
}

impl TourStop {
    pub fn is_domestic(&self) -> bool {
        self.country == DOMESTIC_COUNTRY
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Whether the stop is known to be unannounced, preferring the explicit
    /// flag over markers embedded in the name.
    pub fn is_unannounced(&self) -> bool {
        self.announced
            .map_or_else(|| has_unannounced_marker(&self.name), |announced| !announced)
    }

    /// The city without the unannounced marker.
    pub fn display_city(&self) -> String {
        self.city.replace(CITY_UNANNOUNCED_MARKER, "")
    }
}

pub fn has_unannounced_marker(text: &str) -> bool {
    UNANNOUNCED_MARKERS.iter().any(|marker| text.contains(marker))
        || text.to_ascii_lowercase().contains(ASCII_UNANNOUNCED_MARKER)
}

/// Parses the itinerary document: a JSON array of stops.
pub fn parse_itinerary(json: &str) -> Result<Vec<TourStop>, ItineraryError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "北京站",
            "date": "2025-06-01 至 2025-06-02",
            "coord": [116.4, 39.9],
            "country": "China",
            "province": "北京",
            "city": "北京",
            "location": "国家体育场",
            "setlist-name": "beijing"
        },
        {
            "name": "新加坡站（未官宣）",
            "date": "待定",
            "coord": [103.8, 1.35],
            "country": "Singapore",
            "city": "Singapore（未官宣）",
            "location": ""
        }
    ]"#;

    #[test]
    fn parses_records_with_renamed_fields() -> Result<(), Box<dyn std::error::Error>> {
        let stops = parse_itinerary(SAMPLE)?;
        assert_eq!(stops.len(), 2);

        let beijing = &stops[0];
        assert_eq!(beijing.date_text, "2025-06-01 至 2025-06-02");
        assert_eq!(beijing.coord, Coordinate::new(116.4, 39.9));
        assert_eq!(beijing.venue, "国家体育场");
        assert_eq!(beijing.setlist_name, "beijing");
        assert!(beijing.is_domestic());

        let singapore = &stops[1];
        assert_eq!(singapore.province(), None);
        assert!(singapore.setlist_name.is_empty());
        assert!(!singapore.is_domestic());
        assert_eq!(singapore.display_city(), "Singapore");
        Ok(())
    }

    #[test]
    fn missing_coordinate_is_rejected() {
        let json = r#"[{"name": "x", "date": "2025-01-01"}]"#;
        assert!(parse_itinerary(json).is_err());
    }

    #[test]
    fn explicit_flag_overrides_name_marker() -> Result<(), Box<dyn std::error::Error>> {
        let mut stops = parse_itinerary(SAMPLE)?;
        assert!(stops[1].is_unannounced());

        stops[1].announced = Some(true);
        assert!(!stops[1].is_unannounced());

        stops[0].announced = Some(false);
        assert!(stops[0].is_unannounced());
        Ok(())
    }

    #[test]
    fn ascii_marker_is_case_insensitive() {
        assert!(has_unannounced_marker("Berlin (Unannounced)"));
        assert!(has_unannounced_marker("上海测试"));
        assert!(!has_unannounced_marker("Beijing Test"));
    }
}
