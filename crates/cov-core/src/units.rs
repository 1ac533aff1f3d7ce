//! Immutable scalar value types used by every geodesic computation.
//!
//! Each type wraps exactly one canonical `f64`:
//!
//! | Type       | Canonical unit                                   |
//! |------------|--------------------------------------------------|
//! | [`Angle`]    | radians, always normalised to `(−π, π]`        |
//! | [`Distance`] | radians of arc on the unit sphere              |
//! | [`Altitude`] | metres                                         |
//! | [`Speed`]    | metres per second                              |
//! | [`Time`]     | seconds (a duration, not an instant)           |
//!
//! Storing distances as unit-sphere arc lets the spherical formulas in
//! [`crate::geodesy`] work purely in the angular domain; unit accessors
//! scale by the per-unit Earth radius in [`DistanceUnit::earth_radius`].

use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Absolute tolerance used by every `almost_equals` default.
pub const EPSILON: f64 = 1e-10;

// ── Distance units ────────────────────────────────────────────────────────────

/// Mean Earth radius in metres.  The sphere model accepts ≈0.3 % error
/// against WGS-84.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length units supported by [`Distance`] accessors.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceUnit {
    Radians,
    Meters,
    Kilometers,
    NauticalMiles,
    StatuteMiles,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 5] = [
        DistanceUnit::Radians,
        DistanceUnit::Meters,
        DistanceUnit::Kilometers,
        DistanceUnit::NauticalMiles,
        DistanceUnit::StatuteMiles,
    ];

    /// Earth radius expressed in this unit.
    pub fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Radians       => 1.0,
            DistanceUnit::Meters        => EARTH_RADIUS_M,
            DistanceUnit::Kilometers    => EARTH_RADIUS_M / 1_000.0,
            DistanceUnit::NauticalMiles => EARTH_RADIUS_M / 1_852.0,
            DistanceUnit::StatuteMiles  => EARTH_RADIUS_M / 1_609.344,
        }
    }
}

// ── Shared scalar plumbing ────────────────────────────────────────────────────

/// Arithmetic, ordering and tolerance helpers for a plain (non-wrapping)
/// scalar newtype.
macro_rules! scalar_unit {
    ($name:ident) => {
        impl $name {
            pub const ZERO: $name = $name(0.0);

            #[inline]
            pub fn abs(self) -> $name {
                $name(self.0.abs())
            }

            #[inline]
            pub fn almost_equals(self, other: $name) -> bool {
                self.almost_equals_within(other, EPSILON)
            }

            #[inline]
            pub fn almost_equals_within(self, other: $name, tolerance: f64) -> bool {
                (self.0 - other.0).abs() <= tolerance
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            #[inline]
            pub fn min(self, other: $name) -> $name {
                $name(self.0.min(other.0))
            }

            #[inline]
            pub fn max(self, other: $name) -> $name {
                $name(self.0.max(other.0))
            }
        }

        impl Add for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = $name;
            #[inline]
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            #[inline]
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl Div for $name {
            type Output = f64;
            #[inline]
            fn div(self, rhs: $name) -> f64 {
                self.0 / rhs.0
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                $name(iter.map(|v| v.0).sum())
            }
        }

        impl PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &$name) -> Option<Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }
    };
}

// ── Angle ─────────────────────────────────────────────────────────────────────

/// A plane angle in radians, normalised to `(−π, π]` on every construction.
///
/// Serialises as bare radians; deserialising goes through
/// [`Angle::from_radians`] so stored values are renormalised.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct Angle(f64);

/// Wrap `radians` into `(−π, π]`.  NaN passes through unchanged.
#[inline]
pub fn normalize_radians(radians: f64) -> f64 {
    let mut a = radians % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Radians.
impl From<f64> for Angle {
    fn from(radians: f64) -> Angle {
        Angle::from_radians(radians)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> f64 {
        angle.0
    }
}

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const RIGHT: Angle = Angle(PI / 2.0);
    pub const STRAIGHT: Angle = Angle(PI);

    #[inline]
    pub fn from_radians(radians: f64) -> Angle {
        Angle(normalize_radians(radians))
    }

    #[inline]
    pub fn from_degrees(degrees: f64) -> Angle {
        Angle::from_radians(degrees.to_radians())
    }

    /// Build from degrees, arc-minutes and arc-seconds.  The sign of
    /// `degrees` applies to the whole value.
    pub fn from_dms(degrees: f64, minutes: f64, seconds: f64) -> Angle {
        let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3_600.0;
        Angle::from_degrees(magnitude.copysign(degrees))
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    #[inline]
    pub fn tan(self) -> f64 {
        self.0.tan()
    }

    /// Magnitude in `[0, π]`.
    #[inline]
    pub fn abs(self) -> Angle {
        Angle(self.0.abs())
    }

    #[inline]
    pub fn almost_equals(self, other: Angle) -> bool {
        self.almost_equals_within(other, EPSILON)
    }

    /// Compares the wrapped difference, so `π` and `−π + ε` are close.
    #[inline]
    pub fn almost_equals_within(self, other: Angle, tolerance: f64) -> bool {
        (self - other).0.abs() <= tolerance
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle::from_radians(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_radians(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Angle {
        Angle::from_radians(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn mul(self, rhs: f64) -> Angle {
        Angle::from_radians(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn div(self, rhs: f64) -> Angle {
        Angle::from_radians(self.0 / rhs)
    }
}

impl Div for Angle {
    type Output = f64;
    #[inline]
    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

impl PartialOrd for Angle {
    #[inline]
    fn partial_cmp(&self, other: &Angle) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.degrees())
    }
}

// ── Distance ──────────────────────────────────────────────────────────────────

/// A length stored as arc on the unit sphere.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distance(f64);

scalar_unit!(Distance);

impl Distance {
    #[inline]
    pub fn from_radians(radians: f64) -> Distance {
        Distance(radians)
    }

    #[inline]
    pub fn from_unit(value: f64, unit: DistanceUnit) -> Distance {
        Distance(value / unit.earth_radius())
    }

    #[inline]
    pub fn from_meters(meters: f64) -> Distance {
        Distance::from_unit(meters, DistanceUnit::Meters)
    }

    #[inline]
    pub fn from_kilometers(km: f64) -> Distance {
        Distance::from_unit(km, DistanceUnit::Kilometers)
    }

    #[inline]
    pub fn from_nautical_miles(nm: f64) -> Distance {
        Distance::from_unit(nm, DistanceUnit::NauticalMiles)
    }

    #[inline]
    pub fn from_statute_miles(mi: f64) -> Distance {
        Distance::from_unit(mi, DistanceUnit::StatuteMiles)
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn in_unit(self, unit: DistanceUnit) -> f64 {
        self.0 * unit.earth_radius()
    }

    #[inline]
    pub fn meters(self) -> f64 {
        self.in_unit(DistanceUnit::Meters)
    }

    #[inline]
    pub fn kilometers(self) -> f64 {
        self.in_unit(DistanceUnit::Kilometers)
    }

    #[inline]
    pub fn nautical_miles(self) -> f64 {
        self.in_unit(DistanceUnit::NauticalMiles)
    }

    #[inline]
    pub fn statute_miles(self) -> f64 {
        self.in_unit(DistanceUnit::StatuteMiles)
    }

    /// Hypotenuse of two orthogonal distances.
    #[inline]
    pub fn hypot(self, other: Distance) -> Distance {
        Distance(self.0.hypot(other.0))
    }
}

impl Div<Time> for Distance {
    type Output = Speed;
    #[inline]
    fn div(self, rhs: Time) -> Speed {
        Speed::from_meters_per_second(self.meters() / rhs.seconds())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} km", self.kilometers())
    }
}

// ── Altitude ──────────────────────────────────────────────────────────────────

/// Height above the reference sphere, in metres.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Altitude(f64);

scalar_unit!(Altitude);

impl Altitude {
    const METERS_PER_FOOT: f64 = 0.3048;

    #[inline]
    pub fn from_meters(meters: f64) -> Altitude {
        Altitude(meters)
    }

    #[inline]
    pub fn from_feet(feet: f64) -> Altitude {
        Altitude(feet * Self::METERS_PER_FOOT)
    }

    #[inline]
    pub fn meters(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn feet(self) -> f64 {
        self.0 / Self::METERS_PER_FOOT
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

// ── Speed ─────────────────────────────────────────────────────────────────────

/// A speed in metres per second.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed(f64);

scalar_unit!(Speed);

impl Speed {
    #[inline]
    pub fn from_meters_per_second(mps: f64) -> Speed {
        Speed(mps)
    }

    #[inline]
    pub fn from_kilometers_per_hour(kmh: f64) -> Speed {
        Speed(kmh / 3.6)
    }

    #[inline]
    pub fn from_knots(knots: f64) -> Speed {
        Speed(knots * 1_852.0 / 3_600.0)
    }

    #[inline]
    pub fn from_miles_per_hour(mph: f64) -> Speed {
        Speed(mph * 1_609.344 / 3_600.0)
    }

    #[inline]
    pub fn meters_per_second(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn kilometers_per_hour(self) -> f64 {
        self.0 * 3.6
    }

    #[inline]
    pub fn knots(self) -> f64 {
        self.0 * 3_600.0 / 1_852.0
    }

    #[inline]
    pub fn miles_per_hour(self) -> f64 {
        self.0 * 3_600.0 / 1_609.344
    }
}

impl Mul<Time> for Speed {
    type Output = Distance;
    #[inline]
    fn mul(self, rhs: Time) -> Distance {
        Distance::from_meters(self.0 * rhs.seconds())
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km/h", self.kilometers_per_hour())
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

/// An elapsed duration in seconds.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(f64);

scalar_unit!(Time);

impl Time {
    #[inline]
    pub fn from_seconds(seconds: f64) -> Time {
        Time(seconds)
    }

    #[inline]
    pub fn from_minutes(minutes: f64) -> Time {
        Time(minutes * 60.0)
    }

    #[inline]
    pub fn from_hours(hours: f64) -> Time {
        Time(hours * 3_600.0)
    }

    /// Elapsed time from `earlier` to `later` (negative if reversed).
    pub fn between(earlier: chrono::DateTime<chrono::Utc>, later: chrono::DateTime<chrono::Utc>) -> Time {
        Time::from(later - earlier)
    }

    #[inline]
    pub fn seconds(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn minutes(self) -> f64 {
        self.0 / 60.0
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.0 / 3_600.0
    }
}

impl From<chrono::TimeDelta> for Time {
    fn from(delta: chrono::TimeDelta) -> Time {
        let secs = delta.num_seconds() as f64;
        let nanos = delta.subsec_nanos() as f64 / 1e9;
        Time(secs + nanos)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} s", self.0)
    }
}
