//! Tunables for the graph restructuring passes.

use cov_core::{Angle, Distance};

/// Thresholds used by [`crate::restructure`].
///
/// Typically loaded from a TOML/JSON file by the application crate; the
/// defaults match what the coverage pipeline has always used.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestructureConfig {
    /// Ways longer than this are cut into roughly equal pieces.  Default 4 km.
    pub max_way_length: Distance,

    /// Ways no longer than this (and with at most `short_way_max_legs`
    /// legs) are merged into a collinear neighbour.  Default 1 km.
    pub short_way_length: Distance,

    /// Default 2.
    pub short_way_max_legs: usize,

    /// Largest direction change accepted when merging.  Default 5°.
    pub merge_angle: Angle,
}

impl Default for RestructureConfig {
    fn default() -> Self {
        Self {
            max_way_length:     Distance::from_kilometers(4.0),
            short_way_length:   Distance::from_kilometers(1.0),
            short_way_max_legs: 2,
            merge_angle:        Angle::from_degrees(5.0),
        }
    }
}
