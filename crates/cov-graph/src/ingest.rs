//! Building a [`Map`] from raw extract records.
//!
//! Readers (the PBF loader in [`crate::osm`], or any other extract format)
//! feed nodes and ways into an [`Ingest`] in whatever order the source
//! yields them; [`Ingest::finish`] then keeps only what the coverage map
//! needs:
//!
//! - ways whose `highway` tag is a recognised road class;
//! - nodes referenced by a kept way, plus populated places
//!   ([`NodeKind::is_populated_place`]).
//!
//! Tag values are classified on arrival.  Unknown surface or place values
//! fall back to `Unknown`; a numeric tag that does not parse is a hard
//! [`GraphError::Parse`].

use std::collections::{HashMap, HashSet};

use cov_core::{CoreError, Coordinates};

use crate::model::WayAttributes;
use crate::tags::{HighwayType, NodeKind, Smoothness, Surface};
use crate::{GraphError, GraphResult, Map};

// ── Tags ──────────────────────────────────────────────────────────────────────

/// Look up `key` in a borrowed tag list.
pub fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "yes" | "1" | "true")
}

/// Derive way attributes from its tags.  Returns `Ok(None)` for anything
/// that is not a recognised road.
///
/// The second element is `true` when `oneway=-1` asks for the node order
/// to be reversed.
pub fn classify_way(osm_id: i64, tags: &[(&str, &str)]) -> GraphResult<Option<(WayAttributes, bool)>> {
    let Some(highway) = tag(tags, "highway") else {
        return Ok(None);
    };
    let (class, is_link) = HighwayType::classify(highway);
    if !class.is_road() {
        return Ok(None);
    }

    let lanes = match tag(tags, "lanes") {
        None => 0,
        Some(value) => value.trim().parse::<u8>().map_err(|_| GraphError::Parse {
            element: format!("way {osm_id}"),
            key:     "lanes".to_string(),
            value:   value.to_string(),
        })?,
    };

    let oneway_tag = tag(tags, "oneway").unwrap_or("");
    let reversed = oneway_tag == "-1";
    let one_way = reversed || is_truthy(oneway_tag) || class.implies_one_way();

    let attrs = WayAttributes {
        name: tag(tags, "name").unwrap_or_default().to_string(),
        highway: class,
        is_link,
        surface: tag(tags, "surface").map_or(Surface::Unknown, Surface::from_tag),
        smoothness: tag(tags, "smoothness").map_or(Smoothness::Unknown, Smoothness::from_tag),
        lit: tag(tags, "lit").is_some_and(is_truthy),
        lanes,
        one_way,
    };
    Ok(Some((attrs, reversed)))
}

// ── Builder ───────────────────────────────────────────────────────────────────

struct PendingWay {
    osm_id: i64,
    attrs:  WayAttributes,
    refs:   Vec<i64>,
}

/// Accumulates raw records and assembles the map in [`Ingest::finish`].
#[derive(Default)]
pub struct Ingest {
    nodes: HashMap<i64, (Coordinates, NodeKind)>,
    ways:  Vec<PendingWay>,
}

impl Ingest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node.  Only the `place` tag is inspected.
    ///
    /// # Errors
    ///
    /// [`CoreError::NonFiniteCoordinate`] for NaN or infinite input.
    pub fn add_node(&mut self, osm_id: i64, lat_deg: f64, lon_deg: f64, tags: &[(&str, &str)]) -> GraphResult<()> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(CoreError::NonFiniteCoordinate { lat: lat_deg, lon: lon_deg }.into());
        }
        let kind = tag(tags, "place").map_or(NodeKind::Waypoint, NodeKind::from_tag);
        self.nodes.insert(osm_id, (Coordinates::from_degrees(lat_deg, lon_deg), kind));
        Ok(())
    }

    /// Record a way.  Returns `false` when the way is not a road and was
    /// dropped.
    pub fn add_way(&mut self, osm_id: i64, mut refs: Vec<i64>, tags: &[(&str, &str)]) -> GraphResult<bool> {
        let Some((attrs, reversed)) = classify_way(osm_id, tags)? else {
            return Ok(false);
        };
        if reversed {
            refs.reverse();
        }
        self.ways.push(PendingWay { osm_id, attrs, refs });
        Ok(true)
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Assemble and recalculate the map.
    ///
    /// Node ids are assigned in ascending OSM id order so the result does
    /// not depend on input order.  Way references to unknown nodes are
    /// skipped with a warning; ways left with fewer than two distinct
    /// consecutive nodes are dropped.
    pub fn finish(self) -> GraphResult<Map> {
        let Ingest { nodes, ways } = self;

        let referenced: HashSet<i64> = ways.iter().flat_map(|w| w.refs.iter().copied()).collect();
        let mut keep: Vec<i64> = nodes
            .iter()
            .filter(|(id, (_, kind))| referenced.contains(id) || kind.is_populated_place())
            .map(|(&id, _)| id)
            .collect();
        keep.sort_unstable();

        let mut map = Map::new();
        for osm_id in keep {
            if let Some(&(coords, kind)) = nodes.get(&osm_id) {
                map.add_node(osm_id, coords, kind)?;
            }
        }

        let mut skipped_refs = 0usize;
        let mut dropped_ways = 0usize;
        for way in ways {
            let mut chain = Vec::with_capacity(way.refs.len());
            for osm_ref in &way.refs {
                match map.node_by_osm_id(*osm_ref) {
                    Some(id) if chain.last() != Some(&id) => chain.push(id),
                    Some(_) => {}
                    None => {
                        log::warn!("way {}: node {} is not in the extract; skipped", way.osm_id, osm_ref);
                        skipped_refs += 1;
                    }
                }
            }
            if chain.len() < 2 {
                dropped_ways += 1;
                continue;
            }
            map.add_way(way.osm_id, way.attrs, &chain)?;
        }

        map.recalculate();
        log::info!(
            "ingested {} nodes, {} ways ({} way(s) dropped, {} missing node ref(s))",
            map.node_count(),
            map.way_count(),
            dropped_ways,
            skipped_refs
        );
        Ok(map)
    }
}
