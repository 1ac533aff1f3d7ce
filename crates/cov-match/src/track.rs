//! Validated GPS tracks.
//!
//! The matcher trusts its input, so everything it relies on is checked
//! here once: coordinates are finite and timestamps never go backwards.

use chrono::{DateTime, Utc};

use cov_core::geodesy::orthodromic_distance;
use cov_core::{Coordinates, Distance, Time};

use crate::{MatchError, MatchResult};

/// One timestamped position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsFix {
    pub coords: Coordinates,
    pub time:   DateTime<Utc>,
}

impl GpsFix {
    pub fn new(coords: Coordinates, time: DateTime<Utc>) -> Self {
        Self { coords, time }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64, time: DateTime<Utc>) -> Self {
        Self::new(Coordinates::from_degrees(lat_deg, lon_deg), time)
    }
}

/// A named, chronologically ordered sequence of fixes.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTrack {
    name:  String,
    fixes: Vec<GpsFix>,
}

impl GpsTrack {
    /// Validate and wrap `fixes`.
    ///
    /// # Errors
    ///
    /// [`MatchError::NonFiniteFix`] or [`MatchError::TimeReversed`] naming
    /// the first offending fix.
    pub fn new(name: impl Into<String>, fixes: Vec<GpsFix>) -> MatchResult<Self> {
        let name = name.into();
        for (index, fix) in fixes.iter().enumerate() {
            if !fix.coords.is_finite() {
                return Err(MatchError::NonFiniteFix {
                    track: name,
                    index,
                    lat: fix.coords.latitude.degrees(),
                    lon: fix.coords.longitude.degrees(),
                });
            }
            if index > 0 && fix.time < fixes[index - 1].time {
                return Err(MatchError::TimeReversed {
                    track: name,
                    index,
                    previous: fixes[index - 1].time,
                    time: fix.time,
                });
            }
        }
        Ok(Self { name, fixes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixes(&self) -> &[GpsFix] {
        &self.fixes
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Consecutive fix pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&GpsFix, &GpsFix)> + '_ {
        self.fixes.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn length(&self) -> Distance {
        self.legs().map(|(a, b)| orthodromic_distance(&a.coords, &b.coords)).sum()
    }

    pub fn duration(&self) -> Time {
        match (self.fixes.first(), self.fixes.last()) {
            (Some(first), Some(last)) => Time::between(first.time, last.time),
            _ => Time::ZERO,
        }
    }
}
