//! Candidate-leg cache around the current GPS position.
//!
//! # Spatial index
//!
//! [`LegIndex`] is an R-tree (via `rstar`) over leg start positions in
//! `[lat, lon]` radians.  A range query returns a superset of the legs
//! whose start lies within a Mercator radius; the exact Mercator test then
//! filters it, so the result equals a full scan of the map.

use std::f64::consts::{FRAC_PI_2, PI};

use rstar::{RTree, RTreeObject, AABB};

use cov_core::geodesy::mercator_distance;
use cov_core::{Coordinates, Distance, LegId};
use cov_graph::Map;

// ── R-tree leg entry ──────────────────────────────────────────────────────────

#[derive(Clone)]
struct LegEntry {
    point: [f64; 2], // [lat, lon] radians
    leg:   LegId,
}

impl RTreeObject for LegEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// Slack added to query boxes so boundary points survive rounding.
const BOX_SLACK: f64 = 1e-9;

// ── LegIndex ──────────────────────────────────────────────────────────────────

/// Static index of every leg's start node, stamped with the
/// [`Map::generation`] it was built from.
pub struct LegIndex {
    tree:       RTree<LegEntry>,
    leg_count:  usize,
    generation: u64,
}

impl LegIndex {
    pub fn build(map: &Map) -> Self {
        let entries: Vec<LegEntry> = map
            .legs()
            .map(|(id, leg)| {
                let c = map.node(leg.start).coords;
                LegEntry { point: [c.latitude.radians(), c.longitude.radians()], leg: id }
            })
            .collect();
        Self { leg_count: entries.len(), generation: map.generation(), tree: RTree::bulk_load(entries) }
    }

    /// `false` once `map` has had legs added, moved, or renumbered since
    /// the build.
    pub fn is_current(&self, map: &Map) -> bool {
        self.generation == map.generation()
    }

    /// Number of legs indexed.
    pub fn len(&self) -> usize {
        self.leg_count
    }

    pub fn is_empty(&self) -> bool {
        self.leg_count == 0
    }

    /// Legs whose start lies within Mercator distance `radius` of `center`,
    /// sorted by id.
    pub fn within(&self, map: &Map, center: &Coordinates, radius: Distance) -> Vec<LegId> {
        let mut legs: Vec<LegId> = query_boxes(center, radius)
            .into_iter()
            .flat_map(|bbox| self.tree.locate_in_envelope(&bbox))
            .filter(|entry| mercator_distance(center, &map.node(map.leg(entry.leg).start).coords) <= radius)
            .map(|entry| entry.leg)
            .collect();
        legs.sort_unstable();
        legs.dedup();
        legs
    }
}

/// Boxes in `[lat, lon]` radians covering every point within Mercator
/// distance `radius` of `center`.  Two boxes when the longitude window
/// wraps the antimeridian.
fn query_boxes(center: &Coordinates, radius: Distance) -> Vec<AABB<[f64; 2]>> {
    let r = radius.radians() + BOX_SLACK;
    let lat = center.latitude.radians();
    let lon = center.longitude.radians();
    let (lat_lo, lat_hi) = (lat - r, lat + r);

    // The Mercator metric shrinks longitude by cos(mean latitude), which is
    // smallest at the box edge farthest from the equator.
    let extreme = lat.abs() + r;
    let half_width = if extreme >= FRAC_PI_2 { PI } else { (r / extreme.cos()).min(PI) };

    if half_width >= PI {
        return vec![AABB::from_corners([lat_lo, -PI], [lat_hi, PI])];
    }
    let (lon_lo, lon_hi) = (lon - half_width, lon + half_width);
    let mut boxes = vec![AABB::from_corners([lat_lo, lon_lo.max(-PI)], [lat_hi, lon_hi.min(PI)])];
    if lon_lo < -PI {
        boxes.push(AABB::from_corners([lat_lo, lon_lo + 2.0 * PI], [lat_hi, PI]));
    }
    if lon_hi > PI {
        boxes.push(AABB::from_corners([lat_lo, -PI], [lat_hi, lon_hi - 2.0 * PI]));
    }
    boxes
}

// ── SpatialCache ──────────────────────────────────────────────────────────────

/// The current working set of candidate legs.
///
/// The set is refilled around a new centre whenever the next GPS point plus
/// its look-ahead could leave the cached disc.
pub struct SpatialCache {
    index:  LegIndex,
    range:  Distance,
    center: Option<Coordinates>,
    legs:   Vec<LegId>,
}

impl SpatialCache {
    pub fn new(map: &Map, range: Distance) -> Self {
        Self { index: LegIndex::build(map), range, center: None, legs: Vec::new() }
    }

    /// Forget the centre so the next [`SpatialCache::ensure`] refills.
    pub fn reset(&mut self) {
        self.center = None;
        self.legs.clear();
    }

    /// Make sure the cache covers `point` plus `lookahead`.  Returns `true`
    /// when the candidate set was refilled.
    pub fn ensure(&mut self, map: &Map, point: &Coordinates, lookahead: Distance) -> bool {
        if !self.index.is_current(map) {
            log::debug!("map structure changed; rebuilding leg index ({} legs)", map.leg_count());
            self.index = LegIndex::build(map);
            self.center = None;
        }
        let stale = match &self.center {
            None => true,
            Some(center) => mercator_distance(center, point) + lookahead > self.range,
        };
        if stale {
            self.center = Some(*point);
            self.legs = self.index.within(map, point, self.range);
            log::debug!("cache recentred at {point}: {} candidate leg(s)", self.legs.len());
        }
        stale
    }

    pub fn legs(&self) -> &[LegId] {
        &self.legs
    }

    pub fn center(&self) -> Option<Coordinates> {
        self.center
    }
}
