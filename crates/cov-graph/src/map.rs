//! The road map: arenas of nodes, legs, and ways plus aggregate lengths.
//!
//! # Data layout
//!
//! `Map` owns three `Vec`s indexed by [`NodeId`], [`LegId`], and [`WayId`].
//! Cross-references are ids only, which removes the node ↔ leg ownership
//! cycle and lets readers share a `&Map` freely.
//!
//! Ids stay stable while ways are split or merged.  Operations that delete
//! entities ([`Map::remove_nodes`], and the merge pass in
//! [`crate::restructure`]) finish with a compaction that renumbers every
//! arena, so ids taken before such a call must not be reused after it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use cov_core::geodesy::{orthodromic_bearing, orthodromic_distance};
use cov_core::{Angle, Coordinates, Distance, LegId, NodeId, WayId};

use crate::model::{Leg, Node, Way, WayAttributes};
use crate::tags::NodeKind;
use crate::{GraphError, GraphResult};

// ── Totals ────────────────────────────────────────────────────────────────────

/// Length roll-ups over all ways and over the target highway classes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapTotals {
    pub total_length:          Distance,
    pub total_visited_length:  Distance,
    pub target_length:         Distance,
    pub target_visited_length: Distance,
}

impl MapTotals {
    /// Visited share of the target classes in `[0, 1]`; zero for an empty
    /// target set.
    pub fn target_coverage(&self) -> f64 {
        if self.target_length.radians() > 0.0 {
            self.target_visited_length / self.target_length
        } else {
            0.0
        }
    }

    pub fn total_coverage(&self) -> f64 {
        if self.total_length.radians() > 0.0 {
            self.total_visited_length / self.total_length
        } else {
            0.0
        }
    }
}

// ── Map ───────────────────────────────────────────────────────────────────────

/// Arena-backed road graph.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Map {
    nodes: Vec<Node>,
    legs:  Vec<Leg>,
    ways:  Vec<Way>,

    /// External OSM id → arena id.
    osm_index: HashMap<i64, NodeId>,

    totals: MapTotals,

    /// Bumped by every edit that adds, moves, or renumbers legs.
    generation: u64,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a node and return its arena id.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if `osm_id` is already present.
    pub fn add_node(&mut self, osm_id: i64, coords: Coordinates, kind: NodeKind) -> GraphResult<NodeId> {
        if self.osm_index.contains_key(&osm_id) {
            return Err(GraphError::DuplicateNode(osm_id));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(osm_id, coords, kind));
        self.osm_index.insert(osm_id, id);
        Ok(id)
    }

    /// Add a way through `nodes` (in travel order), creating one leg per
    /// consecutive pair and registering each leg with both endpoints.
    ///
    /// Geometry is not computed here; call [`Map::recalculate`] afterwards.
    pub fn add_way(&mut self, osm_id: i64, attrs: WayAttributes, nodes: &[NodeId]) -> GraphResult<WayId> {
        if nodes.len() < 2 {
            return Err(GraphError::DegenerateWay { osm_id, nodes: nodes.len() });
        }
        if let Some(&missing) = nodes.iter().find(|n| n.index() >= self.nodes.len()) {
            return Err(GraphError::NodeNotFound(missing));
        }

        let way_id = WayId(self.ways.len() as u32);
        let mut legs = Vec::with_capacity(nodes.len() - 1);
        for pair in nodes.windows(2) {
            let leg_id = LegId(self.legs.len() as u32);
            self.legs.push(Leg::new(pair[0], pair[1], way_id));
            self.nodes[pair[0].index()].legs.push(leg_id);
            self.nodes[pair[1].index()].legs.push(leg_id);
            legs.push(leg_id);
        }
        self.ways.push(Way::new(osm_id, attrs, legs));
        self.generation += 1;
        Ok(way_id)
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structural version of the leg arena.  Changes whenever legs are
    /// added, reassigned to another way, or renumbered; caches keyed on
    /// [`LegId`] compare it to know when to rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn leg(&self, id: LegId) -> &Leg {
        &self.legs[id.index()]
    }

    #[inline]
    pub fn leg_mut(&mut self, id: LegId) -> &mut Leg {
        &mut self.legs[id.index()]
    }

    #[inline]
    pub fn way(&self, id: WayId) -> &Way {
        &self.ways[id.index()]
    }

    #[inline]
    pub fn way_mut(&mut self, id: WayId) -> &mut Way {
        &mut self.ways[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn legs(&self) -> impl Iterator<Item = (LegId, &Leg)> + '_ {
        self.legs.iter().enumerate().map(|(i, l)| (LegId(i as u32), l))
    }

    pub fn ways(&self) -> impl Iterator<Item = (WayId, &Way)> + '_ {
        self.ways.iter().enumerate().map(|(i, w)| (WayId(i as u32), w))
    }

    pub fn node_by_osm_id(&self, osm_id: i64) -> Option<NodeId> {
        self.osm_index.get(&osm_id).copied()
    }

    /// Node sequence of a way: the first leg's start, then every leg's end.
    pub fn way_nodes(&self, id: WayId) -> impl Iterator<Item = NodeId> + '_ {
        let legs = &self.ways[id.index()].legs;
        legs.first()
            .map(|&l| self.legs[l.index()].start)
            .into_iter()
            .chain(legs.iter().map(|&l| self.legs[l.index()].end))
    }

    pub fn way_first_node(&self, id: WayId) -> Option<NodeId> {
        self.ways[id.index()].first_leg().map(|l| self.legs[l.index()].start)
    }

    pub fn way_last_node(&self, id: WayId) -> Option<NodeId> {
        self.ways[id.index()].last_leg().map(|l| self.legs[l.index()].end)
    }

    /// Start and end coordinates of a leg.
    #[inline]
    pub fn leg_endpoints(&self, id: LegId) -> (Coordinates, Coordinates) {
        let leg = &self.legs[id.index()];
        (self.nodes[leg.start.index()].coords, self.nodes[leg.end.index()].coords)
    }

    pub fn totals(&self) -> MapTotals {
        self.totals
    }

    // ── Recalculation ─────────────────────────────────────────────────────

    /// Refresh every leg's geometry, every way's aggregates, and the map
    /// totals.
    pub fn recalculate(&mut self) {
        for i in 0..self.ways.len() {
            self.recalculate_way(WayId(i as u32));
        }
        self.recalculate_totals();
    }

    /// Walk one way's node sequence, caching leg geometry and node part
    /// lengths, then roll up `length`, `visited_length`, and `visited`.
    ///
    /// A leg counts as visited length only when both of its endpoint nodes
    /// are marked visited.
    pub fn recalculate_way(&mut self, id: WayId) {
        let Map { nodes, legs, ways, .. } = self;
        let way = &mut ways[id.index()];

        if let Some(first) = way.legs.first() {
            let start = &mut nodes[legs[first.index()].start.index()];
            start.part_length = Distance::ZERO;
            start.part_direction = Angle::ZERO;
        }

        let mut length = Distance::ZERO;
        let mut visited_length = Distance::ZERO;
        let mut last_visited = way.last_visited;

        for &leg_id in &way.legs {
            let leg = &mut legs[leg_id.index()];
            let from = nodes[leg.start.index()].coords;
            let to = nodes[leg.end.index()].coords;

            leg.length = orthodromic_distance(&from, &to);
            leg.direction = orthodromic_bearing(&from, &to);

            let end = &mut nodes[leg.end.index()];
            end.part_length = leg.length;
            end.part_direction = leg.direction;

            length = length + leg.length;
            if nodes[leg.start.index()].visited && nodes[leg.end.index()].visited {
                visited_length = visited_length + leg.length;
            }
            last_visited = latest(last_visited, leg.last_visited);
        }

        way.length = length;
        way.visited_length = visited_length;
        way.visited = length.almost_equals(visited_length);
        way.last_visited = last_visited;
    }

    fn recalculate_totals(&mut self) {
        let mut totals = MapTotals::default();
        for way in &self.ways {
            totals.total_length = totals.total_length + way.length;
            totals.total_visited_length = totals.total_visited_length + way.visited_length;
            if way.attrs.highway.is_target() {
                totals.target_length = totals.target_length + way.length;
                totals.target_visited_length = totals.target_visited_length + way.visited_length;
            }
        }
        self.totals = totals;
    }

    // ── Structural edits (used by restructuring) ──────────────────────────

    /// Cut way `id` before leg index `at`, moving `legs[at..]` into a new
    /// way appended at the end of the way list.  Both pieces are
    /// recalculated.
    pub(crate) fn split_way(&mut self, id: WayId, at: usize) -> WayId {
        let tail_id = WayId(self.ways.len() as u32);
        let tail_legs = self.ways[id.index()].legs.split_off(at);
        for &leg in &tail_legs {
            self.legs[leg.index()].way = tail_id;
        }
        let tail = self.ways[id.index()].sibling(tail_legs);
        self.ways.push(tail);
        self.generation += 1;

        self.recalculate_way(id);
        self.recalculate_way(tail_id);
        tail_id
    }

    /// Move every leg of `source` onto the end of `target`, leaving
    /// `source` empty.
    pub(crate) fn append_way(&mut self, target: WayId, source: WayId) {
        let moved = std::mem::take(&mut self.ways[source.index()].legs);
        for &leg in &moved {
            self.legs[leg.index()].way = target;
        }
        self.ways[target.index()].legs.extend(moved);
        self.generation += 1;
        self.recalculate_way(source);
        self.recalculate_way(target);
    }

    /// Move every leg of `source` onto the front of `target`, leaving
    /// `source` empty.
    pub(crate) fn prepend_way(&mut self, target: WayId, source: WayId) {
        let mut moved = std::mem::take(&mut self.ways[source.index()].legs);
        for &leg in &moved {
            self.legs[leg.index()].way = target;
        }
        let target_way = &mut self.ways[target.index()];
        moved.append(&mut target_way.legs);
        target_way.legs = moved;
        self.generation += 1;
        self.recalculate_way(source);
        self.recalculate_way(target);
    }

    // ── Removal and compaction ────────────────────────────────────────────

    /// Remove a single node.  See [`Map::remove_nodes`].
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<()> {
        if id.index() >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(id));
        }
        self.remove_nodes(&[id]);
        Ok(())
    }

    /// Remove `doomed` nodes together with every leg touching them.
    ///
    /// A way that loses an interior leg is split into its remaining
    /// contiguous runs; ways left without legs are dropped.  All arenas are
    /// renumbered and totals refreshed, so the map never holds a leg that
    /// references a missing node.
    pub fn remove_nodes(&mut self, doomed: &[NodeId]) {
        let mut removed = vec![false; self.nodes.len()];
        for id in doomed {
            if let Some(flag) = removed.get_mut(id.index()) {
                *flag = true;
            }
        }

        let old_ways = std::mem::take(&mut self.ways);
        for way in old_ways {
            let mut run: Vec<LegId> = Vec::new();
            for &leg_id in &way.legs {
                let leg = &self.legs[leg_id.index()];
                if removed[leg.start.index()] || removed[leg.end.index()] {
                    if !run.is_empty() {
                        self.ways.push(way.sibling(std::mem::take(&mut run)));
                    }
                } else {
                    run.push(leg_id);
                }
            }
            if !run.is_empty() {
                self.ways.push(way.sibling(run));
            }
        }

        self.compact(&removed);
        log::debug!(
            "removed {} node(s); {} ways / {} legs remain",
            doomed.len(),
            self.ways.len(),
            self.legs.len()
        );
        self.recalculate();
    }

    /// Drop empty ways, legs no way owns, and nodes flagged in `removed`;
    /// renumber all arenas and rebuild back-references.
    pub(crate) fn compact(&mut self, removed: &[bool]) {
        let mut node_map = vec![NodeId::INVALID; self.nodes.len()];
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, mut node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
            if removed.get(i).copied().unwrap_or(false) {
                continue;
            }
            node_map[i] = NodeId(nodes.len() as u32);
            node.legs.clear();
            nodes.push(node);
        }

        let old_legs = std::mem::take(&mut self.legs);
        let mut legs = Vec::with_capacity(old_legs.len());
        let mut ways = Vec::with_capacity(self.ways.len());

        for mut way in std::mem::take(&mut self.ways) {
            if way.legs.is_empty() {
                continue;
            }
            let way_id = WayId(ways.len() as u32);
            for leg_ref in way.legs.iter_mut() {
                let mut leg = old_legs[leg_ref.index()].clone();
                leg.start = node_map[leg.start.index()];
                leg.end = node_map[leg.end.index()];
                leg.way = way_id;

                let leg_id = LegId(legs.len() as u32);
                nodes[leg.start.index()].legs.push(leg_id);
                nodes[leg.end.index()].legs.push(leg_id);
                legs.push(leg);
                *leg_ref = leg_id;
            }
            ways.push(way);
        }

        self.osm_index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.osm_id, NodeId(i as u32)))
            .collect();
        self.nodes = nodes;
        self.legs = legs;
        self.ways = ways;
        self.generation += 1;
    }

    /// Drop ways emptied by merging.
    pub(crate) fn sweep_empty_ways(&mut self) {
        if self.ways.iter().any(Way::is_empty) {
            self.compact(&[]);
        }
    }

    /// Check the leg-chain and back-reference invariants.  Intended for
    /// tests and debug assertions.
    pub fn validate(&self) -> GraphResult<()> {
        for leg in &self.legs {
            for id in [leg.start, leg.end] {
                if id.index() >= self.nodes.len() {
                    return Err(GraphError::NodeNotFound(id));
                }
            }
        }
        for (way_id, way) in self.ways() {
            for pair in way.legs.windows(2) {
                let (a, b) = (&self.legs[pair[0].index()], &self.legs[pair[1].index()]);
                if a.end != b.start || a.way != way_id || b.way != way_id {
                    return Err(GraphError::BrokenChain { osm_id: way.osm_id });
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
