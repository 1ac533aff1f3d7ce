//! `cov-core` — geodesic primitives for the road coverage toolkit.
//!
//! This crate is a dependency of every other `cov-*` crate.  It has no
//! `cov-*` dependencies and minimal external ones (`thiserror`, `chrono`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`units`]     | `Angle`, `Distance`, `Altitude`, `Speed`, `Time`          |
//! | [`geo`]       | `Coordinates`                                             |
//! | [`geodesy`]   | Mercator / orthodromic / loxodromic formulas, elevation   |
//! | [`ids`]       | `NodeId`, `LegId`, `WayId`                                |
//! | [`format`]    | `NumberFormat` parsing/formatting policy                  |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod format;
pub mod geo;
pub mod geodesy;
pub mod ids;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use format::NumberFormat;
pub use geo::Coordinates;
pub use ids::{LegId, NodeId, WayId};
pub use units::{Altitude, Angle, Distance, DistanceUnit, Speed, Time, EARTH_RADIUS_M, EPSILON};
