//! Per-way coverage report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use cov_core::NumberFormat;
use cov_graph::{HighwayType, Map};

use crate::{IoError, IoResult};

/// One report line.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageRow {
    pub osm_id:           i64,
    pub name:             String,
    pub highway:          HighwayType,
    pub target:           bool,
    pub length_m:         f64,
    pub visited_length_m: f64,
    pub visited:          bool,
    pub last_visited:     Option<DateTime<Utc>>,
}

impl CoverageRow {
    /// Visited share in `[0, 1]`; zero for a zero-length way.
    pub fn coverage(&self) -> f64 {
        if self.length_m > 0.0 { self.visited_length_m / self.length_m } else { 0.0 }
    }
}

/// Rows for every way in way order.  Expects a recalculated map.
pub fn coverage_rows(map: &Map) -> Vec<CoverageRow> {
    map.ways()
        .map(|(_, way)| CoverageRow {
            osm_id:           way.osm_id,
            name:             way.attrs.name.clone(),
            highway:          way.attrs.highway,
            target:           way.attrs.highway.is_target(),
            length_m:         way.length.meters(),
            visited_length_m: way.visited_length.meters(),
            visited:          way.visited,
            last_visited:     way.last_visited,
        })
        .collect()
}

/// Write the coverage report as CSV.  Returns the number of rows.
pub fn write_coverage_report<W: Write>(map: &Map, out: W, format: &NumberFormat) -> IoResult<usize> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record([
        "way_id",
        "name",
        "highway",
        "target",
        "length_m",
        "visited_length_m",
        "coverage",
        "visited",
        "last_visited",
    ])?;
    let rows = coverage_rows(map);
    for row in &rows {
        w.write_record(&[
            row.osm_id.to_string(),
            row.name.clone(),
            row.highway.to_string(),
            format.format_bool(row.target).to_string(),
            format!("{:.1}", row.length_m),
            format!("{:.1}", row.visited_length_m),
            format!("{:.4}", row.coverage()),
            format.format_bool(row.visited).to_string(),
            format.format_optional_timestamp(row.last_visited),
        ])?;
    }
    w.flush()?;
    Ok(rows.len())
}

pub fn save_coverage_report(map: &Map, path: &Path, format: &NumberFormat) -> IoResult<usize> {
    File::create(path)
        .map_err(IoError::from)
        .and_then(|file| write_coverage_report(map, file, format))
        .map_err(|e| e.in_file(path))
}
