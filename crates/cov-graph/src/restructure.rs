//! Passes that reshape ways without changing the underlying legs.
//!
//! | Pass                                   | Effect                                         |
//! |----------------------------------------|------------------------------------------------|
//! | [`divide_ways_by_crossroads`]          | cut ways at interior junctions                 |
//! | [`divide_ways_by_length`]              | cut long ways into near-equal pieces           |
//! | [`combine_short_ways_with_adjacent`]   | fold short stubs into a collinear neighbour    |
//! | [`fix_way_type_in_area`]               | reclassify ways lying inside a polygon         |
//!
//! Every pass moves legs between ways but never creates, removes, or
//! re-measures a leg, so the map's total length is preserved.  Each pass
//! recalculates the map first so it works on current lengths.

use cov_core::{Distance, WayId};

use crate::area::Area;
use crate::tags::HighwayType;
use crate::{Map, RestructureConfig};

/// Counts reported by [`restructure`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestructureStats {
    pub crossroad_splits: usize,
    pub merges:           usize,
    pub length_splits:    usize,
}

/// Run the standard sequence: split at crossroads, merge short stubs, then
/// enforce the maximum length.  Leaves the map recalculated.
pub fn restructure(map: &mut Map, config: &RestructureConfig) -> RestructureStats {
    let stats = RestructureStats {
        crossroad_splits: divide_ways_by_crossroads(map),
        merges:           combine_short_ways_with_adjacent(map, config),
        length_splits:    divide_ways_by_length(map, config.max_way_length),
    };
    map.recalculate();
    log::info!(
        "restructured map: {} crossroad split(s), {} merge(s), {} length split(s); {} ways",
        stats.crossroad_splits,
        stats.merges,
        stats.length_splits,
        map.way_count()
    );
    stats
}

// ── Crossroads ────────────────────────────────────────────────────────────────

/// Index of the first leg (from 1) whose start node is a junction.
fn first_interior_junction(map: &Map, way: WayId) -> Option<usize> {
    map.way(way)
        .legs()
        .iter()
        .enumerate()
        .skip(1)
        .find(|&(_, &leg)| map.node(map.leg(leg).start).is_junction())
        .map(|(i, _)| i)
}

/// Cut every way at each interior junction, appending the tails as new
/// ways (which are processed in turn).  A way that merely starts or ends at
/// a junction is left alone, so a second call performs no splits.
///
/// Returns the number of cuts.
pub fn divide_ways_by_crossroads(map: &mut Map) -> usize {
    map.recalculate();
    let mut splits = 0;
    let mut i = 0;
    while i < map.way_count() {
        let way = WayId(i as u32);
        while let Some(at) = first_interior_junction(map, way) {
            map.split_way(way, at);
            splits += 1;
        }
        i += 1;
    }
    log::debug!("divided ways at {splits} crossroad(s)");
    splits
}

// ── Maximum length ────────────────────────────────────────────────────────────

/// Cut every way longer than `max_length` into pieces of roughly
/// `length / (⌊length / max_length⌋ + 1)`.
///
/// The cut falls before the first leg at which the running length exceeds
/// that target, but never leaves the final leg alone in the tail: the cut
/// then moves one leg earlier.  Cutting continues on the tail with the same
/// target until the remainder is short enough or has fewer than two legs.
///
/// Returns the number of cuts.
pub fn divide_ways_by_length(map: &mut Map, max_length: Distance) -> usize {
    map.recalculate();
    let mut splits = 0;
    let original_count = map.way_count();

    for i in 0..original_count {
        let first = map.way(WayId(i as u32));
        if first.length <= max_length || first.leg_count() < 2 {
            continue;
        }
        let pieces = (first.length / max_length).floor() + 1.0;
        let target = first.length / pieces;

        let mut current = WayId(i as u32);
        loop {
            let way = map.way(current);
            let leg_count = way.leg_count();
            if leg_count < 2 || way.length <= target || way.length.almost_equals(target) {
                break;
            }

            let mut running = Distance::ZERO;
            let mut cut = leg_count - 1;
            for (k, &leg) in way.legs().iter().enumerate() {
                running = running + map.leg(leg).length;
                if running > target {
                    cut = k;
                    break;
                }
            }
            if cut == leg_count - 1 {
                cut -= 1;
            }
            // The head always keeps at least one leg.
            let cut = cut.max(1);

            current = map.split_way(current, cut);
            splits += 1;
        }
    }
    log::debug!("divided long ways with {splits} cut(s)");
    splits
}

// ── Short-way merging ─────────────────────────────────────────────────────────

/// Where a short way attaches to the neighbour it is merged into.
enum Attach {
    /// Short way continues after the neighbour's last leg.
    Append(WayId),
    /// Short way leads into the neighbour's first leg.
    Prepend(WayId),
}

/// Find the first neighbour leg at the short way's first node, then at its
/// last node, that continues it in the same direction with matching
/// attributes.
fn find_merge_partner(map: &Map, way_id: WayId, min_cos: f64) -> Option<Attach> {
    let way = map.way(way_id);
    let first_leg = way.first_leg()?;
    let last_leg = way.last_leg()?;

    let compatible = |candidate: &crate::Leg, boundary: cov_core::LegId| -> bool {
        let own = map.leg(boundary);
        candidate.way != way_id
            && (candidate.direction - own.direction).cos() > min_cos
            && map.way(candidate.way).attrs.mergeable_with(&way.attrs)
    };

    let first_node = map.leg(first_leg).start;
    for &cand_id in map.node(first_node).legs() {
        if cand_id == first_leg {
            continue;
        }
        let cand = map.leg(cand_id);
        if cand.end == first_node
            && map.way(cand.way).last_leg() == Some(cand_id)
            && compatible(cand, first_leg)
        {
            return Some(Attach::Append(cand.way));
        }
    }

    let last_node = map.leg(last_leg).end;
    for &cand_id in map.node(last_node).legs() {
        if cand_id == last_leg {
            continue;
        }
        let cand = map.leg(cand_id);
        if cand.start == last_node
            && map.way(cand.way).first_leg() == Some(cand_id)
            && compatible(cand, last_leg)
        {
            return Some(Attach::Prepend(cand.way));
        }
    }
    None
}

/// Fold every short way into the first compatible neighbour.
///
/// A way qualifies when it has at most `short_way_max_legs` legs and is no
/// longer than `short_way_length`.  A neighbour qualifies when its leg
/// chains onto the short way's first node (or out of its last node),
/// points within `merge_angle` of the short way's boundary leg, and shares
/// highway class, one-way flag, and name.
///
/// Returns the number of ways merged away.
pub fn combine_short_ways_with_adjacent(map: &mut Map, config: &RestructureConfig) -> usize {
    map.recalculate();
    let min_cos = config.merge_angle.cos();
    let mut merges = 0;

    for i in 0..map.way_count() {
        let way_id = WayId(i as u32);
        let way = map.way(way_id);
        if way.is_empty()
            || way.leg_count() > config.short_way_max_legs
            || way.length > config.short_way_length
        {
            continue;
        }
        match find_merge_partner(map, way_id, min_cos) {
            Some(Attach::Append(target)) => map.append_way(target, way_id),
            Some(Attach::Prepend(target)) => map.prepend_way(target, way_id),
            None => continue,
        }
        merges += 1;
    }

    map.sweep_empty_ways();
    map.recalculate();
    log::debug!("merged {merges} short way(s)");
    merges
}

// ── Area reclassification ─────────────────────────────────────────────────────

/// Set `highway` on every way whose first and last nodes both lie inside
/// `area`.  Returns the number of ways changed.
pub fn fix_way_type_in_area(map: &mut Map, area: &Area, highway: HighwayType) -> usize {
    let mut changed = 0;
    for i in 0..map.way_count() {
        let way_id = WayId(i as u32);
        let (Some(first), Some(last)) = (map.way_first_node(way_id), map.way_last_node(way_id)) else {
            continue;
        };
        if area.contains(&map.node(first).coords) && area.contains(&map.node(last).coords) {
            let way = map.way_mut(way_id);
            if way.attrs.highway != highway {
                way.attrs.highway = highway;
                changed += 1;
            }
        }
    }
    map.recalculate();
    changed
}
