//! Coordinate chains for visual checks.
//!
//! A chain is the ordered list of node positions along a way, or along a
//! maximal run of consecutive selected legs inside one way.  Chains are
//! handed to whatever track writer draws them.

use std::io::Write;

use cov_core::{Coordinates, LegId, NumberFormat};
use cov_graph::{Leg, Map};

use crate::IoResult;

/// One chain per way, in way order.  Ways without legs are skipped.
pub fn way_chains(map: &Map) -> Vec<Vec<Coordinates>> {
    map.ways()
        .filter(|(_, w)| !w.is_empty())
        .map(|(id, _)| map.way_nodes(id).map(|n| map.node(n).coords).collect())
        .collect()
}

/// One chain per maximal run of consecutive legs accepted by `select`.
pub fn leg_chains(map: &Map, mut select: impl FnMut(LegId, &Leg) -> bool) -> Vec<Vec<Coordinates>> {
    let mut chains = Vec::new();
    for (_, way) in map.ways() {
        let mut run: Vec<Coordinates> = Vec::new();
        for &leg_id in way.legs() {
            let leg = map.leg(leg_id);
            if select(leg_id, leg) {
                if run.is_empty() {
                    run.push(map.node(leg.start).coords);
                }
                run.push(map.node(leg.end).coords);
            } else if !run.is_empty() {
                chains.push(std::mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            chains.push(run);
        }
    }
    chains
}

pub fn visited_chains(map: &Map) -> Vec<Vec<Coordinates>> {
    leg_chains(map, |_, leg| leg.visited)
}

pub fn unvisited_chains(map: &Map) -> Vec<Vec<Coordinates>> {
    leg_chains(map, |_, leg| !leg.visited)
}

/// Write chains as CSV rows `chain,seq,lat,lon`.
pub fn write_chains_csv<W: Write>(chains: &[Vec<Coordinates>], out: W, format: &NumberFormat) -> IoResult<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["chain", "seq", "lat", "lon"])?;
    for (chain, points) in chains.iter().enumerate() {
        for (seq, point) in points.iter().enumerate() {
            w.write_record(&[
                chain.to_string(),
                seq.to_string(),
                format.format_degrees(point.latitude),
                format.format_degrees(point.longitude),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
