use serde::Serialize;

use crate::scope::MapScope;
use crate::stop::Coordinate;

/// Fraction of the bounding box extent added on each side of each axis.
const PADDING: f64 = 0.1;

/// Latitude spans half the angular range of longitude, so a latitude
/// extent is weighted double when compared against a longitude extent.
const LATITUDE_ASPECT: f64 = 2.0;

/// Longitude span covered at zoom 1.
const REFERENCE_SPAN: f64 = 360.0;

/// Camera framing the visible stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub center: Coordinate,
    pub zoom: f64,
}

impl ViewState {
    /// Longitude span visible at this zoom.
    pub fn lng_span(&self) -> f64 {
        REFERENCE_SPAN / self.zoom.exp2()
    }

    /// `[west, east]` and `[south, north]` bounds for a viewport whose
    /// width/height ratio (in the same angular units) is `aspect`.
    pub fn bounds(&self, aspect: f64) -> ([f64; 2], [f64; 2]) {
        let half_lng = self.lng_span() / 2.0;
        let half_lat = if aspect > 0.0 {
            half_lng / aspect
        } else {
            half_lng / LATITUDE_ASPECT
        };
        (
            [self.center.lng - half_lng, self.center.lng + half_lng],
            [self.center.lat - half_lat, self.center.lat + half_lat],
        )
    }
}

/// Fits a camera around `coords`, falling back to the scope defaults when
/// there is nothing to frame or only a single spot.
pub fn estimate_viewport(coords: &[Coordinate], scope: MapScope) -> ViewState {
    let camera = scope.camera();
    let Some(first) = coords.first() else {
        return ViewState {
            center: camera.fallback_center,
            zoom: camera.fallback_zoom,
        };
    };

    let (mut west, mut east, mut south, mut north) = (first.lng, first.lng, first.lat, first.lat);
    for coord in &coords[1..] {
        west = west.min(coord.lng);
        east = east.max(coord.lng);
        south = south.min(coord.lat);
        north = north.max(coord.lat);
    }

    let pad_lng = (east - west) * PADDING;
    let pad_lat = (north - south) * PADDING;
    let (west, east) = (west - pad_lng, east + pad_lng);
    let (south, north) = (south - pad_lat, north + pad_lat);

    let center = Coordinate::new((west + east) / 2.0, (south + north) / 2.0);
    let lng_extent = east - west;
    let lat_extent = north - south;

    if lng_extent == 0.0 && lat_extent == 0.0 {
        return ViewState {
            center,
            zoom: camera.city_zoom,
        };
    }

    let extent = lng_extent.max(lat_extent * LATITUDE_ASPECT);
    let zoom = (REFERENCE_SPAN / extent)
        .log2()
        .clamp(camera.min_zoom, camera.max_zoom);

    ViewState {
        center,
        zoom: (zoom * 10.0).round() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    fn tour() -> Vec<Coordinate> {
        vec![
            Coordinate::new(116.4, 39.9),
            Coordinate::new(121.47, 31.23),
            Coordinate::new(113.26, 23.13),
            Coordinate::new(104.07, 30.67),
        ]
    }

    #[test]
    fn empty_input_uses_scope_fallback() {
        for scope in MapScope::ALL {
            let view = estimate_viewport(&[], scope);
            assert_eq!(view.center, scope.camera().fallback_center);
            assert_close(view.zoom, scope.camera().fallback_zoom);
        }
    }

    #[test]
    fn single_spot_uses_city_zoom() {
        let spot = Coordinate::new(116.4, 39.9);
        for scope in MapScope::ALL {
            let view = estimate_viewport(&[spot, spot], scope);
            assert_eq!(view.center, spot);
            assert_close(view.zoom, scope.camera().city_zoom);
        }
    }

    #[test]
    fn permutation_does_not_change_the_camera() {
        let forward = tour();
        let mut reversed = tour();
        reversed.reverse();
        let mut rotated = tour();
        rotated.rotate_left(2);

        let expected = estimate_viewport(&forward, MapScope::Domestic);
        assert_eq!(estimate_viewport(&reversed, MapScope::Domestic), expected);
        assert_eq!(estimate_viewport(&rotated, MapScope::Domestic), expected);
    }

    #[test]
    fn center_is_box_midpoint_and_zoom_follows_extent() {
        let view = estimate_viewport(&tour(), MapScope::Domestic);
        assert_close(view.center.lng, (104.07 + 121.47) / 2.0);
        assert_close(view.center.lat, (23.13 + 39.9) / 2.0);

        // lng extent 17.4 * 1.2 = 20.88, lat extent 16.77 * 1.2 * 2 = 40.248
        let expected = (360.0_f64 / 40.248).log2();
        assert_close(view.zoom, (expected * 10.0).round() / 10.0);
    }

    #[test]
    fn zoom_is_clamped_to_scope_band() {
        let antipodal = [Coordinate::new(-179.0, -80.0), Coordinate::new(179.0, 80.0)];
        let close = [Coordinate::new(116.40, 39.90), Coordinate::new(116.41, 39.91)];
        for scope in MapScope::ALL {
            let camera = scope.camera();
            for coords in [&antipodal[..], &close[..], &tour()[..]] {
                let view = estimate_viewport(coords, scope);
                assert!(view.zoom >= camera.min_zoom && view.zoom <= camera.max_zoom);
            }
            assert_close(estimate_viewport(&antipodal, scope).zoom, camera.min_zoom);
            assert_close(estimate_viewport(&close, scope).zoom, camera.max_zoom);
        }
    }

    #[test]
    fn bounds_cover_visible_span() {
        let view = ViewState {
            center: Coordinate::new(100.0, 30.0),
            zoom: 2.0,
        };
        let (x, y) = view.bounds(2.0);
        assert_close(x[1] - x[0], 90.0);
        assert_close(y[1] - y[0], 45.0);
        assert_close((x[0] + x[1]) / 2.0, 100.0);
    }
}
