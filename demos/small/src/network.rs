//! Synthetic road network for the demo.
//!
//! A small town grid near (60°N, 30°E): one primary avenue running east,
//! two residential streets crossing it northwards, and a short service
//! spur.  Built through [`Ingest`] exactly as an extract reader would.

use cov_core::geodesy::orthodromic_destination;
use cov_core::{Angle, Coordinates, Distance};
use cov_graph::{GraphResult, Ingest, Map};

pub const ORIGIN: (f64, f64) = (60.0, 30.0);

/// Spacing between consecutive nodes along every street.
const STEP_M: f64 = 100.0;

fn point(from: Coordinates, bearing_deg: f64, meters: f64) -> Coordinates {
    orthodromic_destination(&from, Angle::from_degrees(bearing_deg), Distance::from_meters(meters))
}

/// Feed `count` evenly spaced nodes starting at `start` into `ingest`,
/// returning their OSM ids.
fn street(ingest: &mut Ingest, first_id: i64, start: Coordinates, bearing_deg: f64, count: usize) -> GraphResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let c = point(start, bearing_deg, STEP_M * i as f64);
        let id = first_id + i as i64;
        ingest.add_node(id, c.latitude.degrees(), c.longitude.degrees(), &[])?;
        ids.push(id);
    }
    Ok(ids)
}

pub fn build_network() -> GraphResult<Map> {
    let origin = Coordinates::from_degrees(ORIGIN.0, ORIGIN.1);
    let mut ingest = Ingest::new();

    // Avenue: 12 nodes east, 1.1 km.
    let avenue = street(&mut ingest, 100, origin, 90.0, 12)?;
    ingest.add_way(1, avenue.clone(), &[("highway", "primary"), ("name", "Main Avenue"), ("lanes", "2")])?;

    // Residential streets cross the avenue at its 3rd and 9th node.
    for (way_id, first, at) in [(2, 200, 2usize), (3, 300, 8usize)] {
        let junction = point(origin, 90.0, STEP_M * at as f64);
        let south = point(junction, 180.0, STEP_M * 3.0);
        let mut refs = street(&mut ingest, first, south, 0.0, 3)?;
        refs.push(avenue[at]);
        refs.extend(street(&mut ingest, first + 10, point(junction, 0.0, STEP_M), 0.0, 3)?);
        ingest.add_way(way_id, refs, &[("highway", "residential"), ("surface", "asphalt")])?;
    }

    // Service spur off the avenue's east end, one-way.
    let end = avenue[avenue.len() - 1];
    let spur_start = point(origin, 90.0, STEP_M * 11.0);
    let mut spur = vec![end];
    spur.extend(street(&mut ingest, 400, point(spur_start, 45.0, STEP_M), 45.0, 2)?);
    ingest.add_way(4, spur, &[("highway", "service"), ("oneway", "yes")])?;

    // A footpath is dropped at ingest.
    let path = street(&mut ingest, 500, point(origin, 0.0, 50.0), 0.0, 3)?;
    ingest.add_way(5, path, &[("highway", "footway")])?;

    // Town centre marker.
    ingest.add_node(900, ORIGIN.0 + 0.002, ORIGIN.1 + 0.004, &[("place", "village"), ("name", "Demo")])?;

    ingest.finish()
}

/// Fix positions along the avenue, then north up the second street.
pub fn commute_points() -> Vec<Coordinates> {
    let origin = Coordinates::from_degrees(ORIGIN.0, ORIGIN.1);
    let mut points: Vec<Coordinates> = (0..=24).map(|i| point(origin, 90.0, 35.0 * i as f64)).collect();
    let junction = point(origin, 90.0, STEP_M * 8.0);
    points.retain(|p| p.longitude <= junction.longitude);
    points.extend((1..=10).map(|i| point(junction, 0.0, 35.0 * i as f64)));
    points
}
