//! Matcher tunables.

use cov_core::{Angle, Distance, Speed, Time};

/// Thresholds used by [`crate::MapMatcher`].
///
/// Tolerances that scale with GPS sample spacing are multiplied by
/// `1 + tolerance_growth_per_km × gps_leg_km`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatcherConfig {
    /// Radius of the candidate-leg cache around its centre.  Default 4 km.
    pub cache_range: Distance,

    /// Link legs and isolated short legs match within this radius of the
    /// GPS point.  Default 256 m.
    pub link_radius: Distance,

    /// A way with a single leg shorter than this is "isolated".  Default 32 m.
    pub isolated_leg_length: Distance,

    /// Allowed bearing deviation before growth.  Default 16°.
    pub base_bearing_tolerance: Angle,

    /// Allowed perpendicular offset before growth.  Default 32 m.
    pub base_offset_tolerance: Distance,

    /// Default 2.0.
    pub tolerance_growth_per_km: f64,

    /// Visits closer together than this count once.  Default 8 min.
    pub revisit_interval: Time,

    /// Length of the speed smoothing window.  Default 5 s.
    pub speed_window: Time,

    /// Smoothed speeds below this never update a leg's speed.  Default 5 km/h.
    pub min_speed: Speed,

    /// Refuse reverse-direction matches on one-way ways.  Default `false`.
    pub check_one_way: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            cache_range:             Distance::from_kilometers(4.0),
            link_radius:             Distance::from_meters(256.0),
            isolated_leg_length:     Distance::from_meters(32.0),
            base_bearing_tolerance:  Angle::from_degrees(16.0),
            base_offset_tolerance:   Distance::from_meters(32.0),
            tolerance_growth_per_km: 2.0,
            revisit_interval:        Time::from_minutes(8.0),
            speed_window:            Time::from_seconds(5.0),
            min_speed:               Speed::from_kilometers_per_hour(5.0),
            check_one_way:           false,
        }
    }
}

impl MatcherConfig {
    /// Scale factor applied to the base tolerances for a GPS leg of
    /// `gps_leg` length.
    pub fn tolerance_growth(&self, gps_leg: Distance) -> f64 {
        1.0 + self.tolerance_growth_per_km * gps_leg.kilometers()
    }
}
