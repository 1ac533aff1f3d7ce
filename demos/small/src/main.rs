//! small — smallest end-to-end run of the road coverage toolkit.
//!
//! Builds a synthetic town network, drives one GPS track over part of it,
//! matches, and writes the persisted map, the coverage report, and the
//! unvisited chains to `output/small/`.

mod network;

use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};

use cov_core::NumberFormat;
use cov_io::{load_map, save_coverage_report, save_map, unvisited_chains, write_chains_csv};
use cov_match::{CoveragePipeline, GpsFix, GpsTrack};

use network::{build_network, commute_points};

// ── Constants ─────────────────────────────────────────────────────────────────

const START_UNIX_SECS: i64 = 1_700_000_000;
const FIX_INTERVAL_SECS: i64 = 3; // ~42 km/h at 35 m spacing
const OUTPUT_DIR: &str = "output/small";

fn commute_track() -> Result<GpsTrack> {
    let fixes = commute_points()
        .into_iter()
        .enumerate()
        .map(|(i, c)| -> Result<GpsFix> {
            let secs = START_UNIX_SECS + FIX_INTERVAL_SECS * i as i64;
            let time = DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| anyhow::anyhow!("timestamp {secs} out of range"))?;
            Ok(GpsFix::new(c, time))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(GpsTrack::new("commute", fixes)?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== small — road coverage ===");

    // 1. Network.
    let mut map = build_network()?;
    println!("Network: {} nodes, {} ways, {} legs", map.node_count(), map.way_count(), map.leg_count());

    // 2. Track.
    let track = commute_track()?;
    println!("Track {:?}: {} fixes, {:.0} m", track.name(), track.len(), track.length().meters());
    println!();

    // 3. Restructure + match.
    let t0 = Instant::now();
    let summary = CoveragePipeline::default().run(&mut map, std::slice::from_ref(&track))?;
    let elapsed = t0.elapsed();

    println!("Pipeline complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  restructure : {} crossroad split(s), {} merge(s), {} length split(s)",
        summary.restructure.crossroad_splits, summary.restructure.merges, summary.restructure.length_splits
    );
    println!(
        "  matching    : {} GPS legs, {} newly visited map leg(s)",
        summary.matching.gps_legs, summary.matching.newly_visited
    );
    println!(
        "  coverage    : {:.1}% of {:.2} km (target roads {:.1}%)",
        summary.totals.total_coverage() * 100.0,
        summary.totals.total_length.kilometers(),
        summary.totals.target_coverage() * 100.0
    );
    println!();

    // 4. Output.
    let format = NumberFormat::default();
    let dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(dir)?;

    let map_path = dir.join("map.xml");
    save_map(&map, &map_path, &format)?;
    let rows = save_coverage_report(&map, &dir.join("coverage.csv"), &format)?;
    let chains = unvisited_chains(&map);
    write_chains_csv(&chains, File::create(dir.join("unvisited.csv"))?, &format)?;

    // 5. The persisted map reads back with identical totals.
    let reloaded = load_map(&map_path, &format)?;
    println!("  map.xml       : {} ways (reloaded {})", map.way_count(), reloaded.way_count());
    println!("  coverage.csv  : {rows} rows");
    println!("  unvisited.csv : {} chain(s)", chains.len());
    println!();

    // 6. Per-way table.
    println!("{:<8} {:<14} {:<12} {:>8} {:>8}", "Way", "Name", "Highway", "Len m", "Cov %");
    println!("{}", "-".repeat(54));
    for row in cov_io::coverage_rows(&map) {
        println!(
            "{:<8} {:<14} {:<12} {:>8.0} {:>8.1}",
            row.osm_id,
            row.name,
            row.highway.as_str(),
            row.length_m,
            row.coverage() * 100.0
        );
    }

    Ok(())
}
