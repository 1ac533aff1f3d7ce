//! Geographic coordinate triple.

use std::fmt;

use crate::units::{Altitude, Angle};

/// A point on (or above) the reference sphere.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    pub latitude:  Angle,
    pub longitude: Angle,
    pub altitude:  Altitude,
}

impl Coordinates {
    /// The all-zero value, used as a "not yet resolved" marker by callers
    /// that cannot hold an `Option`.
    pub const EMPTY: Coordinates = Coordinates {
        latitude:  Angle::ZERO,
        longitude: Angle::ZERO,
        altitude:  Altitude::ZERO,
    };

    #[inline]
    pub fn new(latitude: Angle, longitude: Angle, altitude: Altitude) -> Self {
        Self { latitude, longitude, altitude }
    }

    /// Sea-level point from decimal degrees.
    #[inline]
    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(Angle::from_degrees(lat_deg), Angle::from_degrees(lon_deg), Altitude::ZERO)
    }

    #[inline]
    pub fn with_altitude(self, altitude: Altitude) -> Self {
        Self { altitude, ..self }
    }

    /// `true` iff latitude, longitude and altitude are all exactly zero.
    pub fn is_empty(&self) -> bool {
        self.latitude.radians() == 0.0
            && self.longitude.radians() == 0.0
            && self.altitude.meters() == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }

    pub fn almost_equals(&self, other: &Coordinates) -> bool {
        self.latitude.almost_equals(other.latitude)
            && self.longitude.almost_equals(other.longitude)
            && self.altitude.almost_equals(other.altitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6})",
            self.latitude.degrees(),
            self.longitude.degrees()
        )
    }
}
