//! Spherical geodesy on coordinate pairs.
//!
//! Three families of formulas, all operating on the unit sphere so that
//! [`Distance`] values come out directly in arc radians:
//!
//! | Family      | Use                                                     |
//! |-------------|---------------------------------------------------------|
//! | Mercator    | cheap planar approximation for short proximity checks   |
//! | Orthodromic | great-circle bearing, distance, destination, midpoint   |
//! | Loxodromic  | rhumb-line (constant bearing) bearing, distance, destination |
//!
//! Elevation and direct (chord) distance model both points as offsets from
//! the Earth's centre by `radius + altitude`.
//!
//! Every returned bearing is normalised to `(−π, π]`.  Degenerate inputs
//! (coincident points, east–west rhumb lines, zero-length chords) yield
//! fixed fallback values instead of NaN: stable, but not physically
//! meaningful at those inputs.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::geo::Coordinates;
use crate::units::{Altitude, Angle, Distance, EARTH_RADIUS_M};

/// Below this Mercator-latitude difference a rhumb line is treated as
/// running due east–west.
const RHUMB_FLAT_EPSILON: f64 = 1e-12;

// ── Mercator (planar) ─────────────────────────────────────────────────────────

/// Planar `(east, north)` offsets in unit-sphere radians, scaling longitude
/// by the cosine of the average latitude.
#[inline]
fn mercator_offsets(from: &Coordinates, to: &Coordinates) -> (f64, f64) {
    let d_lat = (to.latitude - from.latitude).radians();
    let d_lon = (to.longitude - from.longitude).radians();
    let avg_lat = (from.latitude.radians() + to.latitude.radians()) / 2.0;
    (d_lon * avg_lat.cos(), d_lat)
}

/// Planar bearing; `0` when the points coincide.
pub fn mercator_bearing(from: &Coordinates, to: &Coordinates) -> Angle {
    let (x, y) = mercator_offsets(from, to);
    if x == 0.0 && y == 0.0 {
        return Angle::ZERO;
    }
    Angle::from_radians(x.atan2(y))
}

/// Planar distance, valid for short separations only.
pub fn mercator_distance(from: &Coordinates, to: &Coordinates) -> Distance {
    let (x, y) = mercator_offsets(from, to);
    Distance::from_radians(x.hypot(y))
}

// ── Orthodromic (great circle) ────────────────────────────────────────────────

/// Initial great-circle bearing from `from` towards `to`.
pub fn orthodromic_bearing(from: &Coordinates, to: &Coordinates) -> Angle {
    let lat1 = from.latitude.radians();
    let lat2 = to.latitude.radians();
    let d_lon = (to.longitude - from.longitude).radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    Angle::from_radians(y.atan2(x))
}

/// Great-circle (haversine) distance.  Altitude is ignored.
pub fn orthodromic_distance(from: &Coordinates, to: &Coordinates) -> Distance {
    let lat1 = from.latitude.radians();
    let lat2 = to.latitude.radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).radians();

    let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    Distance::from_radians(2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}

/// Point reached by following the great circle from `from` on the initial
/// `bearing` for `distance`.  Altitude is carried over unchanged.
pub fn orthodromic_destination(from: &Coordinates, bearing: Angle, distance: Distance) -> Coordinates {
    let lat1 = from.latitude.radians();
    let lon1 = from.longitude.radians();
    let delta = distance.radians();
    let theta = bearing.radians();

    let sin_lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    Coordinates::new(Angle::from_radians(lat2), Angle::from_radians(lon2), from.altitude)
}

/// Great-circle midpoint; altitude is the arithmetic mean.
pub fn orthodromic_midpoint(a: &Coordinates, b: &Coordinates) -> Coordinates {
    let lat1 = a.latitude.radians();
    let lat2 = b.latitude.radians();
    let lon1 = a.longitude.radians();
    let d_lon = (b.longitude - a.longitude).radians();

    let bx = lat2.cos() * d_lon.cos();
    let by = lat2.cos() * d_lon.sin();
    let lat_m = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let lon_m = lon1 + by.atan2(lat1.cos() + bx);

    Coordinates::new(
        Angle::from_radians(lat_m),
        Angle::from_radians(lon_m),
        (a.altitude + b.altitude) / 2.0,
    )
}

// ── Loxodromic (rhumb line) ───────────────────────────────────────────────────

/// Difference of Mercator-projected latitudes, `ln(tan(φ2/2+π/4) / tan(φ1/2+π/4))`.
#[inline]
fn mercator_latitude_delta(lat1: f64, lat2: f64) -> f64 {
    ((lat2 / 2.0 + FRAC_PI_4).tan() / (lat1 / 2.0 + FRAC_PI_4).tan()).ln()
}

/// Ratio of true latitude change to Mercator latitude change, falling back
/// to `cos(φ1)` on an east–west line where both vanish.
#[inline]
fn rhumb_stretch(lat1: f64, d_lat: f64, d_phi: f64) -> f64 {
    if d_phi.abs() > RHUMB_FLAT_EPSILON {
        d_lat / d_phi
    } else {
        lat1.cos()
    }
}

/// Constant bearing of the rhumb line from `from` to `to`, taking the
/// shorter way across the antimeridian.
pub fn loxodromic_bearing(from: &Coordinates, to: &Coordinates) -> Angle {
    let d_phi = mercator_latitude_delta(from.latitude.radians(), to.latitude.radians());
    let d_lon = (to.longitude - from.longitude).radians();
    Angle::from_radians(d_lon.atan2(d_phi))
}

/// Length of the rhumb line between the points.
pub fn loxodromic_distance(from: &Coordinates, to: &Coordinates) -> Distance {
    let lat1 = from.latitude.radians();
    let lat2 = to.latitude.radians();
    let d_lat = lat2 - lat1;
    let d_phi = mercator_latitude_delta(lat1, lat2);
    let d_lon = (to.longitude - from.longitude).radians();

    let q = rhumb_stretch(lat1, d_lat, d_phi);
    Distance::from_radians((d_lat * d_lat + q * q * d_lon * d_lon).sqrt())
}

/// Point reached by holding `bearing` from `from` for `distance`.
/// Altitude is carried over unchanged.
pub fn loxodromic_destination(from: &Coordinates, bearing: Angle, distance: Distance) -> Coordinates {
    let lat1 = from.latitude.radians();
    let delta = distance.radians();
    let theta = bearing.radians();

    let d_lat = delta * theta.cos();
    let mut lat2 = lat1 + d_lat;
    // Past a pole: reflect back onto the sphere.
    if lat2.abs() > FRAC_PI_2 {
        lat2 = if lat2 > 0.0 {
            std::f64::consts::PI - lat2
        } else {
            -std::f64::consts::PI - lat2
        };
    }

    let d_phi = mercator_latitude_delta(lat1, lat2);
    let q = rhumb_stretch(lat1, d_lat, d_phi);
    let d_lon = delta * theta.sin() / q;

    Coordinates::new(
        Angle::from_radians(lat2),
        from.longitude + Angle::from_radians(d_lon),
        from.altitude,
    )
}

// ── Elevation and chord ───────────────────────────────────────────────────────

/// `-1`, `0` or `1`; unlike `f64::signum`, zero maps to zero.
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Distances of both points from the Earth's centre, in metres, plus the
/// orthodromic central angle between them.
#[inline]
fn radial_geometry(from: &Coordinates, to: &Coordinates) -> (f64, f64, f64) {
    let r1 = EARTH_RADIUS_M + from.altitude.meters();
    let r2 = EARTH_RADIUS_M + to.altitude.meters();
    let gamma = orthodromic_distance(from, to).radians();
    (r1, r2, gamma)
}

#[inline]
fn chord_m(r1: f64, r2: f64, gamma: f64) -> f64 {
    (r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * gamma.cos()).sqrt()
}

/// Straight-line (through the sphere) distance including altitude.
///
/// A chord that degenerates to NaN through rounding is reported as the bare
/// altitude difference.
pub fn direct_distance(from: &Coordinates, to: &Coordinates) -> Distance {
    let (r1, r2, gamma) = radial_geometry(from, to);
    let chord = chord_m(r1, r2, gamma);
    if chord.is_nan() {
        return Distance::from_meters((r2 - r1).abs());
    }
    Distance::from_meters(chord)
}

/// Angle above (positive) or below (negative) the local horizon at `from`
/// at which `to` is seen.
///
/// When the chord degenerates the result is ±90° by the sign of the
/// altitude difference, and `0` for equal altitudes.
pub fn elevation(from: &Coordinates, to: &Coordinates) -> Angle {
    let (r1, r2, gamma) = radial_geometry(from, to);
    let chord = chord_m(r1, r2, gamma);

    let horizontal = r2 * gamma.sin() / chord;
    if !horizontal.is_finite() {
        return Angle::RIGHT * sign(r2 - r1);
    }

    let magnitude = horizontal.clamp(-1.0, 1.0).acos();
    let below_horizon = r2 * gamma.cos() < r1;
    if gamma >= FRAC_PI_2 || below_horizon {
        Angle::from_radians(-magnitude)
    } else {
        Angle::from_radians(magnitude)
    }
}

/// Convenience: altitude difference between two points.
#[inline]
pub fn altitude_delta(from: &Coordinates, to: &Coordinates) -> Altitude {
    to.altitude - from.altitude
}
