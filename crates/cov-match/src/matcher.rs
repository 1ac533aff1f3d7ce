//! Tiered GPS-to-leg matching.
//!
//! For every consecutive pair of fixes (a "GPS leg") the matcher:
//!
//! 1. feeds `(Δt, Δd)` into the [`SpeedSmoother`];
//! 2. recentres the [`SpatialCache`] if the GPS leg could leave it;
//! 3. tests every cached leg against three tiers, in order:
//!    - **link** legs match within `link_radius` of the GPS point;
//!    - **isolated** legs (sole leg of a way, shorter than
//!      `isolated_leg_length`) match within `link_radius`;
//!    - everything else must pass a distance gate, a bearing gate (forward,
//!      or reversed unless one-way checking forbids it) and an offset gate
//!      on [`min_leg_offset`].
//!
//! Legs are only ever marked visited, never un-marked, so repeated runs
//! over many tracks accumulate.

use std::ops::AddAssign;

use chrono::{DateTime, Utc};

use cov_core::geodesy::mercator_distance;
use cov_core::{Angle, Distance, LegId, Speed, Time};
use cov_graph::Map;

use crate::cache::SpatialCache;
use crate::offset::{min_leg_offset, Segment};
use crate::smoothing::SpeedSmoother;
use crate::{GpsTrack, MatcherConfig};

// ── Statistics ────────────────────────────────────────────────────────────────

/// Counters accumulated while matching.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchStats {
    /// Fix pairs examined.
    pub gps_legs:        usize,
    pub cache_refreshes: usize,
    /// Legs that went from unvisited to visited.
    pub newly_visited:   usize,
    /// Positive (GPS leg, map leg) classifications.
    pub visit_events:    usize,
}

impl AddAssign for MatchStats {
    fn add_assign(&mut self, rhs: MatchStats) {
        self.gps_legs += rhs.gps_legs;
        self.cache_refreshes += rhs.cache_refreshes;
        self.newly_visited += rhs.newly_visited;
        self.visit_events += rhs.visit_events;
    }
}

// ── Tolerances for one GPS leg ────────────────────────────────────────────────

struct Gates {
    bearing_radians: f64,
    offset:          Distance,
}

impl Gates {
    fn for_leg(config: &MatcherConfig, gps: &Segment) -> Self {
        let growth = config.tolerance_growth(gps.length);
        Self {
            bearing_radians: config.base_bearing_tolerance.radians().abs() * growth,
            offset:          config.base_offset_tolerance * growth,
        }
    }
}

// ── MapMatcher ────────────────────────────────────────────────────────────────

/// Marks map legs visited from GPS tracks.
///
/// The leg index is rebuilt automatically whenever the map's legs have been
/// split, merged, or renumbered since the last match.
pub struct MapMatcher {
    pub config: MatcherConfig,
    cache:      SpatialCache,
}

impl MapMatcher {
    pub fn new(map: &Map, config: MatcherConfig) -> Self {
        let cache = SpatialCache::new(map, config.cache_range);
        Self { config, cache }
    }

    /// Match one track, mutating leg and node visitation state in `map`.
    ///
    /// Way and map aggregates are not refreshed; call
    /// [`Map::recalculate`] once all tracks are matched.
    pub fn match_track(&mut self, map: &mut Map, track: &GpsTrack) -> MatchStats {
        let mut stats = MatchStats::default();
        let mut smoother = SpeedSmoother::new(self.config.speed_window);
        self.cache.reset();

        for (from, to) in track.legs() {
            let gps = Segment::new(from.coords, to.coords);
            let speed = smoother.push(Time::between(from.time, to.time), gps.length);
            stats.gps_legs += 1;

            if self.cache.ensure(map, &gps.start, gps.length) {
                stats.cache_refreshes += 1;
            }

            let gates = Gates::for_leg(&self.config, &gps);
            for &leg_id in self.cache.legs() {
                if matches(&self.config, map, leg_id, &gps, &gates) {
                    visit(&self.config, map, leg_id, to.time, speed, &mut stats);
                }
            }
        }

        log::debug!(
            "track {:?}: {} GPS legs, {} cache refresh(es), {} new leg(s), {} visit event(s)",
            track.name(),
            stats.gps_legs,
            stats.cache_refreshes,
            stats.newly_visited,
            stats.visit_events
        );
        stats
    }
}

/// Apply the three matching tiers to one candidate leg.
fn matches(config: &MatcherConfig, map: &Map, leg_id: LegId, gps: &Segment, gates: &Gates) -> bool {
    let leg = map.leg(leg_id);
    let way = map.way(leg.way);
    let (start, end) = map.leg_endpoints(leg_id);
    let distance = mercator_distance(&gps.start, &start);

    if way.attrs.is_link {
        return distance < config.link_radius;
    }
    if way.leg_count() == 1 && leg.length < config.isolated_leg_length && distance < config.link_radius {
        return true;
    }

    // A stationary pair has no bearing to compare.
    if gps.length.radians() <= 0.0 {
        return false;
    }
    if distance > (gps.length + leg.length).hypot(gates.offset) {
        return false;
    }

    let deviation = (gps.direction - leg.direction).radians().abs();
    let forward = deviation <= gates.bearing_radians;
    let reverse_allowed = !(config.check_one_way && way.attrs.one_way);
    let backward = reverse_allowed && (Angle::STRAIGHT.radians() - deviation) <= gates.bearing_radians;
    if !forward && !backward {
        return false;
    }

    let candidate = Segment { start, end, direction: leg.direction, length: leg.length };
    min_leg_offset(gps, &candidate).is_some_and(|offset| offset <= gates.offset)
}

/// Record a positive match on `leg_id` at `time`.
fn visit(config: &MatcherConfig, map: &mut Map, leg_id: LegId, time: DateTime<Utc>, speed: Speed, stats: &mut MatchStats) {
    let leg = map.leg_mut(leg_id);
    if !leg.visited {
        stats.newly_visited += 1;
    }
    leg.visited = true;

    let counts = match leg.last_visited {
        None => true,
        Some(previous) => Time::between(previous, time) > config.revisit_interval,
    };
    if counts {
        leg.visited_count += 1;
    }
    leg.last_visited = Some(leg.last_visited.map_or(time, |previous| previous.max(time)));

    if speed >= config.min_speed {
        leg.speed = if leg.speed == Speed::ZERO { speed } else { (leg.speed + speed) / 2.0 };
    }

    let (start, end) = (leg.start, leg.end);
    map.node_mut(start).mark_visited(time);
    map.node_mut(end).mark_visited(time);
    stats.visit_events += 1;
}
