use std::collections::HashMap;

use serde::Serialize;

use crate::stop::Coordinate;

/// Rounding applied before comparing coordinates: 4 decimals, about 11 m.
const KEY_SCALE: f64 = 10_000.0;

/// Radius, in degrees, of the circle overlapping markers are spread on.
pub const OFFSET_RADIUS_DEG: f64 = 0.12;

/// A coordinate rounded to 4 decimal places, usable as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    lng: i64,
    lat: i64,
}

impl CoordKey {
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(coord: Coordinate) -> Self {
        Self {
            lng: (coord.lng * KEY_SCALE).round() as i64,
            lat: (coord.lat * KEY_SCALE).round() as i64,
        }
    }
}

/// Where a marker is drawn. `coordinate` differs from `original` only when
/// `offset` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub coordinate: Coordinate,
    pub original: Coordinate,
    pub offset: bool,
}

impl Placement {
    const fn untouched(coord: Coordinate) -> Self {
        Self {
            coordinate: coord,
            original: coord,
            offset: false,
        }
    }
}

/// Reverse index from a rounded original coordinate to the positions that
/// share it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateIndex {
    groups: HashMap<CoordKey, Vec<usize>>,
}

impl CoordinateIndex {
    pub fn build(coords: &[Coordinate]) -> Self {
        let mut groups: HashMap<CoordKey, Vec<usize>> = HashMap::new();
        for (index, coord) in coords.iter().enumerate() {
            groups.entry(CoordKey::of(*coord)).or_default().push(index);
        }
        Self { groups }
    }

    /// Positions sharing `coord` after rounding, in input order.
    pub fn members(&self, coord: Coordinate) -> &[usize] {
        self.groups
            .get(&CoordKey::of(coord))
            .map_or(&[], Vec::as_slice)
    }
}

/// Spreads markers that share a rounded coordinate evenly around a circle
/// centred on it, the `i`-th member of a `k`-group at angle `2π·i/k`.
/// Singletons are returned as they are. The input is never modified.
pub fn spread_overlapping(coords: &[Coordinate]) -> Vec<Placement> {
    let index = CoordinateIndex::build(coords);
    let mut placements: Vec<Placement> = coords.iter().copied().map(Placement::untouched).collect();

    for members in index.groups.values().filter(|g| g.len() > 1) {
        #[allow(clippy::cast_precision_loss)]
        let size = members.len() as f64;
        for (slot, &position) in members.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let angle = std::f64::consts::TAU * slot as f64 / size;
            let original = coords[position];
            placements[position] = Placement {
                coordinate: Coordinate::new(
                    angle.cos().mul_add(OFFSET_RADIUS_DEG, original.lng),
                    angle.sin().mul_add(OFFSET_RADIUS_DEG, original.lat),
                ),
                original,
                offset: true,
            };
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    fn distance(a: Coordinate, b: Coordinate) -> f64 {
        (a.lng - b.lng).hypot(a.lat - b.lat)
    }

    #[test]
    fn singleton_is_left_untouched() {
        let coords = [Coordinate::new(116.4, 39.9), Coordinate::new(121.47, 31.23)];
        let placements = spread_overlapping(&coords);
        for (placement, coord) in placements.iter().zip(coords) {
            assert!(!placement.offset);
            assert_eq!(placement.coordinate, coord);
            assert_eq!(placement.original, coord);
        }
    }

    #[test]
    fn group_members_are_evenly_spaced_on_the_circle() {
        let center = Coordinate::new(116.4, 39.9);
        for k in 2..=6 {
            let coords = vec![center; k];
            let placements = spread_overlapping(&coords);

            let mut angles = Vec::new();
            for placement in &placements {
                assert!(placement.offset);
                assert_eq!(placement.original, center);
                assert_close(distance(placement.coordinate, center), OFFSET_RADIUS_DEG);
                angles.push(
                    (placement.coordinate.lat - center.lat)
                        .atan2(placement.coordinate.lng - center.lng)
                        .rem_euclid(std::f64::consts::TAU),
                );
            }

            #[allow(clippy::cast_precision_loss)]
            let step = 360.0 / k as f64;
            for (i, angle) in angles.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                assert_close(angle.to_degrees(), step * i as f64);
            }

            for (i, a) in placements.iter().enumerate() {
                for b in &placements[i + 1..] {
                    assert!(distance(a.coordinate, b.coordinate) > 1e-6);
                }
            }
        }
    }

    #[test]
    fn rounding_collapses_float_noise_only() {
        let coords = [
            Coordinate::new(116.400_001, 39.9),
            Coordinate::new(116.4, 39.900_002),
            Coordinate::new(116.401, 39.9),
        ];
        let placements = spread_overlapping(&coords);
        assert!(placements[0].offset);
        assert!(placements[1].offset);
        assert!(!placements[2].offset);

        let index = CoordinateIndex::build(&coords);
        assert_eq!(index.members(Coordinate::new(116.4, 39.9)), &[0, 1]);
        assert_eq!(index.members(Coordinate::new(116.401, 39.9)), &[2]);
        assert!(index.members(Coordinate::new(0.0, 0.0)).is_empty());
    }
}
