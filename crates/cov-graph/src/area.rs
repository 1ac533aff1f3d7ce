//! Polygon areas for reclassification.

use cov_core::Coordinates;

/// A closed polygon given by its vertices in order.  The closing edge from
/// the last vertex back to the first is implied.
///
/// Containment runs on raw latitude/longitude radians, so a polygon that
/// straddles the ±180° meridian gives wrong answers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub vertices: Vec<Coordinates>,
}

impl Area {
    pub fn new(vertices: Vec<Coordinates>) -> Self {
        Self { vertices }
    }

    /// Build from `(lat, lon)` pairs in decimal degrees.
    pub fn from_degrees(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(lat, lon)| Coordinates::from_degrees(lat, lon)).collect())
    }

    /// Even–odd crossing-number test.  Fewer than three vertices contain
    /// nothing.
    pub fn contains(&self, point: &Coordinates) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let (px, py) = (point.longitude.radians(), point.latitude.radians());

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].longitude.radians(), self.vertices[i].latitude.radians());
            let (xj, yj) = (self.vertices[j].longitude.radians(), self.vertices[j].latitude.radians());
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
