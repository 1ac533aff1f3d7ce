//! `cov-graph` — the road graph and the passes that reshape it.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`model`]       | `Node`, `Leg`, `Way`, `WayAttributes`                      |
//! | [`map`]         | `Map` arenas, recalculation, node removal, `MapTotals`     |
//! | [`restructure`] | crossroad / length splitting, short-way merging, area fix  |
//! | [`area`]        | `Area` polygon containment                                 |
//! | [`tags`]        | `HighwayType`, `NodeKind`, `Surface`, `Smoothness`         |
//! | [`ingest`]      | `Ingest` builder from raw extract records                  |
//! | [`config`]      | `RestructureConfig`                                        |
//! | [`osm`]         | `load_from_pbf` (feature = `"osm"` only)                   |
//! | [`error`]       | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod area;
pub mod config;
pub mod error;
pub mod ingest;
pub mod map;
pub mod model;
pub mod restructure;
pub mod tags;

#[cfg(feature = "osm")]
pub mod osm;


pub use area::Area;
pub use config::RestructureConfig;
pub use error::{GraphError, GraphResult};
pub use ingest::Ingest;
pub use map::{Map, MapTotals};
pub use model::{Leg, Node, Way, WayAttributes};
pub use restructure::{restructure, RestructureStats};
pub use tags::{HighwayType, NodeKind, Smoothness, Surface};
