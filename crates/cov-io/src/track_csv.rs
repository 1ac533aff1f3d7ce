//! Minimal CSV GPS track adapter.
//!
//! # CSV format
//!
//! ```csv
//! lat,lon,time
//! 60.000000,30.000000,2024-05-01T10:00:00Z
//! 60.001000,30.000000,2024-05-01T10:00:10Z
//! ```
//!
//! `time` is RFC 3339.  Rows must already be in chronological order; the
//! resulting track is validated like any other [`GpsTrack`].

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;

use cov_core::NumberFormat;
use cov_match::{GpsFix, GpsTrack};

use crate::{IoError, IoResult};

#[derive(Deserialize)]
struct TrackRecord {
    lat:  f64,
    lon:  f64,
    time: String,
}

/// Read a track named `name` from any CSV source.
pub fn read_track_csv<R: Read>(name: &str, input: R, format: &NumberFormat) -> IoResult<GpsTrack> {
    let mut reader = csv::Reader::from_reader(input);
    let mut fixes = Vec::new();
    for (i, record) in reader.deserialize::<TrackRecord>().enumerate() {
        let record = record?;
        // Header is line 1.
        let time = format
            .parse_timestamp(&record.time)
            .map_err(|source| IoError::Row { row: i as u64 + 2, source })?;
        fixes.push(GpsFix::from_degrees(record.lat, record.lon, time));
    }
    Ok(GpsTrack::new(name, fixes)?)
}

/// Read a track from `path`, naming it after the file stem.
pub fn load_track_csv(path: &Path, format: &NumberFormat) -> IoResult<GpsTrack> {
    let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let track = File::open(path)
        .map_err(IoError::from)
        .and_then(|file| read_track_csv(&name, file, format))
        .map_err(|e| e.in_file(path))?;
    log::debug!("loaded track {:?}: {} fixes", track.name(), track.len());
    Ok(track)
}

/// Write `track` in the format [`read_track_csv`] accepts.
pub fn write_track_csv<W: Write>(track: &GpsTrack, out: W, format: &NumberFormat) -> IoResult<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["lat", "lon", "time"])?;
    for fix in track.fixes() {
        w.write_record(&[
            format.format_degrees(fix.coords.latitude),
            format.format_degrees(fix.coords.longitude),
            format.format_timestamp(fix.time),
        ])?;
    }
    w.flush()?;
    Ok(())
}
