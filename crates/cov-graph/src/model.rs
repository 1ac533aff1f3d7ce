//! Road-graph entities: nodes, directed legs, and ways.
//!
//! Entities never point at each other directly.  A [`Leg`] names its
//! endpoints by [`NodeId`] and its owner by [`WayId`]; a [`Node`] lists the
//! [`LegId`]s incident to it.  All ids resolve through the owning
//! [`crate::Map`].

use chrono::{DateTime, Utc};

use cov_core::{Angle, Coordinates, Distance, LegId, NodeId, Speed, WayId};

use crate::tags::{HighwayType, NodeKind, Smoothness, Surface};

// ── Node ──────────────────────────────────────────────────────────────────────

/// A graph vertex.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Stable external (OSM) id.
    pub osm_id: i64,
    pub coords: Coordinates,
    pub kind:   NodeKind,

    /// Distance from the previous node along the last way recalculated
    /// through this node.  Zero at the start of a way.
    pub part_length:    Distance,
    /// Bearing from that previous node.
    pub part_direction: Angle,

    pub visited:      bool,
    pub last_visited: Option<DateTime<Utc>>,

    /// Every leg that starts or ends here.
    pub(crate) legs: Vec<LegId>,
}

impl Node {
    pub fn new(osm_id: i64, coords: Coordinates, kind: NodeKind) -> Self {
        Self {
            osm_id,
            coords,
            kind,
            part_length:    Distance::ZERO,
            part_direction: Angle::ZERO,
            visited:        false,
            last_visited:   None,
            legs:           Vec::new(),
        }
    }

    /// Incident legs, in insertion order.
    pub fn legs(&self) -> &[LegId] {
        &self.legs
    }

    /// A junction has more than two incident legs.
    pub fn is_junction(&self) -> bool {
        self.legs.len() > 2
    }

    /// Record a visit at `time`; visits never move the timestamp backwards.
    pub fn mark_visited(&mut self, time: DateTime<Utc>) {
        self.visited = true;
        self.last_visited = Some(self.last_visited.map_or(time, |t| t.max(time)));
    }
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// A directed edge between two adjacent nodes of one way.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub start: NodeId,
    pub end:   NodeId,
    pub way:   WayId,

    /// Orthodromic bearing start → end, refreshed by recalculation.
    pub direction: Angle,
    /// Orthodromic length, refreshed by recalculation.
    pub length:    Distance,

    pub visited:       bool,
    pub visited_count: u32,
    pub last_visited:  Option<DateTime<Utc>>,
    /// Running mean of matched GPS speeds.  Zero until first matched above
    /// the noise floor.
    pub speed: Speed,
}

impl Leg {
    pub fn new(start: NodeId, end: NodeId, way: WayId) -> Self {
        Self {
            start,
            end,
            way,
            direction:     Angle::ZERO,
            length:        Distance::ZERO,
            visited:       false,
            visited_count: 0,
            last_visited:  None,
            speed:         Speed::ZERO,
        }
    }
}

// ── Way ───────────────────────────────────────────────────────────────────────

/// Road attributes shared by every leg of a way.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WayAttributes {
    pub name:       String,
    pub highway:    HighwayType,
    pub is_link:    bool,
    pub surface:    Surface,
    pub smoothness: Smoothness,
    pub lit:        bool,
    pub lanes:      u8,
    pub one_way:    bool,
}

impl WayAttributes {
    pub fn new(highway: HighwayType) -> Self {
        Self { highway, ..Self::default() }
    }

    /// Ways may only be joined when class, direction rule and name agree.
    pub fn mergeable_with(&self, other: &WayAttributes) -> bool {
        self.highway == other.highway && self.one_way == other.one_way && self.name == other.name
    }
}

/// An ordered chain of legs sharing road attributes.
///
/// Invariant: for consecutive legs `a`, `b` in `legs`, `a.end == b.start`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    pub osm_id: i64,
    pub attrs:  WayAttributes,

    pub(crate) legs: Vec<LegId>,

    pub length:         Distance,
    pub visited_length: Distance,
    pub visited:        bool,
    pub last_visited:   Option<DateTime<Utc>>,
}

impl Way {
    pub(crate) fn new(osm_id: i64, attrs: WayAttributes, legs: Vec<LegId>) -> Self {
        Self {
            osm_id,
            attrs,
            legs,
            length:         Distance::ZERO,
            visited_length: Distance::ZERO,
            visited:        false,
            last_visited:   None,
        }
    }

    /// A split-off piece carrying the same identity and attributes.
    pub(crate) fn sibling(&self, legs: Vec<LegId>) -> Self {
        let mut way = Way::new(self.osm_id, self.attrs.clone(), legs);
        way.last_visited = self.last_visited;
        way
    }

    pub fn legs(&self) -> &[LegId] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn first_leg(&self) -> Option<LegId> {
        self.legs.first().copied()
    }

    pub fn last_leg(&self) -> Option<LegId> {
        self.legs.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}
