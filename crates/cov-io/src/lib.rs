//! `cov-io` — adapters between the coverage map and the outside world.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`xml`]       | persisted map: `write_map` / `read_map`, path variants    |
//! | [`export`]    | coordinate chains per way or per selected-leg run         |
//! | [`track_csv`] | `lat,lon,time` GPS track reader and writer                |
//! | [`report`]    | per-way coverage CSV                                      |
//! | [`error`]     | `IoError`, `IoResult<T>`                                  |
//!
//! All text goes through an explicit [`cov_core::NumberFormat`].

pub mod error;
pub mod export;
pub mod report;
pub mod track_csv;
pub mod xml;

#[cfg(test)]
mod tests;

pub use error::{IoError, IoResult};
pub use export::{leg_chains, unvisited_chains, visited_chains, way_chains, write_chains_csv};
pub use report::{coverage_rows, save_coverage_report, write_coverage_report, CoverageRow};
pub use track_csv::{load_track_csv, read_track_csv, write_track_csv};
pub use xml::{load_map, read_map, save_map, write_map};
