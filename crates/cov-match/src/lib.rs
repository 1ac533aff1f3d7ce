//! `cov-match` — marking road legs visited from GPS tracks.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`track`]     | `GpsFix`, validated `GpsTrack`                           |
//! | [`smoothing`] | `SpeedSmoother` sliding-window speed                     |
//! | [`offset`]    | `Segment`, `min_leg_offset`                              |
//! | [`cache`]     | `LegIndex` (R-tree) and `SpatialCache`                   |
//! | [`matcher`]   | `MapMatcher`, `MatchStats`                               |
//! | [`pipeline`]  | `CoveragePipeline`, `CoverageSummary`                    |
//! | [`config`]    | `MatcherConfig`                                          |
//! | [`error`]     | `MatchError`, `MatchResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod offset;
pub mod pipeline;
pub mod smoothing;
pub mod track;


pub use cache::{LegIndex, SpatialCache};
pub use config::MatcherConfig;
pub use error::{MatchError, MatchResult};
pub use matcher::{MapMatcher, MatchStats};
pub use offset::{min_leg_offset, Segment};
pub use pipeline::{CoveragePipeline, CoverageSummary};
pub use smoothing::SpeedSmoother;
pub use track::{GpsFix, GpsTrack};
