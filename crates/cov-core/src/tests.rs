//! Unit tests for cov-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LegId, NodeId, WayId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::from_index(42), Some(id));
        assert_eq!(NodeId::from_index(u32::MAX as usize), None);
        assert_eq!(NodeId::from_index(usize::MAX), None);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(LegId::INVALID.0, u32::MAX);
        assert!(!WayId::INVALID.is_valid());
        assert!(WayId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(LegId(7).to_string(), "leg #7");
        assert_eq!(NodeId::INVALID.to_string(), "node #invalid");
    }
}

#[cfg(test)]
mod angle {
    use std::f64::consts::PI;

    use crate::Angle;

    #[test]
    fn degrees_stay_in_half_open_range() {
        let mut d = -1_000.0;
        while d <= 1_000.0 {
            let a = Angle::from_degrees(d);
            assert!(a.degrees() > -180.0 && a.degrees() <= 180.0, "{d} -> {}", a.degrees());
            d += 7.3;
        }
    }

    #[test]
    fn degrees_roundtrip_inside_range() {
        for d in [-179.999, -90.0, -0.5, 0.0, 12.345, 90.0, 179.999] {
            assert!((Angle::from_degrees(d).degrees() - d).abs() < 1e-9, "{d}");
        }
    }

    #[test]
    fn wraps_to_positive_pi() {
        assert!((Angle::from_radians(-PI).radians() - PI).abs() < 1e-12);
        assert!((Angle::from_degrees(530.0).degrees() - 170.0).abs() < 1e-9);
        assert!((Angle::from_degrees(190.0).degrees() + 170.0).abs() < 1e-9);
    }

    #[test]
    fn arithmetic_renormalises() {
        let a = Angle::from_degrees(170.0) + Angle::from_degrees(20.0);
        assert!((a.degrees() + 170.0).abs() < 1e-9);

        let b = Angle::from_degrees(-170.0) - Angle::from_degrees(20.0);
        assert!((b.degrees() - 170.0).abs() < 1e-9);

        let c = Angle::from_degrees(100.0) * 2.0;
        assert!((c.degrees() + 160.0).abs() < 1e-9);
    }

    #[test]
    fn abs_and_almost_equals() {
        assert!(Angle::from_degrees(-30.0).abs().almost_equals(Angle::from_degrees(30.0)));
        assert!(Angle::from_radians(PI).almost_equals(Angle::from_radians(-PI + 1e-12)));
        assert!(!Angle::from_degrees(1.0).almost_equals(Angle::from_degrees(1.001)));
    }

    #[test]
    fn dms() {
        let a = Angle::from_dms(-60.0, 30.0, 0.0);
        assert!((a.degrees() + 60.5).abs() < 1e-9);
    }

    #[test]
    fn raw_radians_are_normalised() {
        let a = Angle::from(2.5 * PI);
        assert!((a.radians() - PI / 2.0).abs() < 1e-12);
        assert!((f64::from(Angle::from(-1.5)) + 1.5).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialised_angle_is_normalised() {
        let a: Angle = serde_json::from_str("7.0").unwrap();
        assert!((a.radians() - (7.0 - 2.0 * PI)).abs() < 1e-12);
        assert_eq!(serde_json::to_string(&Angle::from_radians(1.0)).unwrap(), "1.0");
    }
}

#[cfg(test)]
mod distance {
    use crate::{Distance, DistanceUnit};

    #[test]
    fn kilometers_roundtrip_through_every_unit() {
        for km in [0.0, 0.001, 1.0, 111.2, 20_000.0] {
            let d = Distance::from_kilometers(km);
            assert!((d.kilometers() - km).abs() < 1e-9, "{km}");
            for unit in DistanceUnit::ALL {
                let back = Distance::from_unit(d.in_unit(unit), unit);
                assert!((back.kilometers() - km).abs() < 1e-9, "{km} via {unit:?}");
            }
        }
    }

    #[test]
    fn unit_table() {
        assert!((Distance::from_nautical_miles(1.0).meters() - 1_852.0).abs() < 1e-6);
        assert!((Distance::from_statute_miles(1.0).meters() - 1_609.344).abs() < 1e-6);
        assert!((Distance::from_radians(1.0).kilometers() - 6_371.0).abs() < 1e-6);
    }

    #[test]
    fn arithmetic_and_ordering() {
        let a = Distance::from_meters(300.0);
        let b = Distance::from_meters(200.0);
        assert!(((a + b).meters() - 500.0).abs() < 1e-6);
        assert!(((a - b).meters() - 100.0).abs() < 1e-6);
        assert!(((b - a).abs().meters() - 100.0).abs() < 1e-6);
        assert!((a / b - 1.5).abs() < 1e-12);
        assert!(a > b);
        let total: Distance = [a, b, b].into_iter().sum();
        assert!((total.meters() - 700.0).abs() < 1e-6);
    }
}

#[cfg(test)]
mod speed_and_time {
    use chrono::{TimeZone, Utc};

    use crate::{Altitude, Distance, Speed, Time};

    #[test]
    fn speed_units() {
        let s = Speed::from_kilometers_per_hour(36.0);
        assert!((s.meters_per_second() - 10.0).abs() < 1e-12);
        assert!((Speed::from_knots(1.0).kilometers_per_hour() - 1.852).abs() < 1e-9);
        assert!((Speed::from_miles_per_hour(60.0).miles_per_hour() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn distance_over_time() {
        let s = Distance::from_meters(111.0) / Time::from_seconds(10.0);
        assert!((s.meters_per_second() - 11.1).abs() < 1e-9);
        let d = s * Time::from_seconds(20.0);
        assert!((d.meters() - 222.0).abs() < 1e-6);
    }

    #[test]
    fn time_between_instants() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 1, 12, 8, 30).unwrap();
        assert!((Time::between(a, b).minutes() - 8.5).abs() < 1e-12);
        assert!((Time::between(b, a).seconds() + 510.0).abs() < 1e-12);
    }

    #[test]
    fn altitude_feet() {
        assert!((Altitude::from_feet(1_000.0).meters() - 304.8).abs() < 1e-9);
    }
}

#[cfg(test)]
mod geodesy {
    use std::f64::consts::PI;

    use crate::geodesy::*;
    use crate::{Altitude, Angle, Coordinates, Distance};

    fn p(lat: f64, lon: f64) -> Coordinates {
        Coordinates::from_degrees(lat, lon)
    }

    #[test]
    fn one_degree_north() {
        let a = p(60.0, 30.0);
        let b = p(61.0, 30.0);
        assert!(orthodromic_bearing(&a, &b).degrees().abs() < 0.5);
        let km = orthodromic_distance(&a, &b).kilometers();
        assert!((km - 111.2).abs() < 1.112, "got {km}");
    }

    #[test]
    fn zero_distance_to_self() {
        for q in [p(0.0, 0.0), p(60.0, 30.0), p(-45.5, 179.9), p(89.9, -120.0)] {
            assert!(orthodromic_distance(&q, &q).meters() < 1e-6);
            assert!(mercator_distance(&q, &q).meters() < 1e-6);
            assert_eq!(mercator_bearing(&q, &q), Angle::ZERO);
        }
    }

    #[test]
    fn reverse_bearings_differ_by_pi() {
        let pairs = [
            (p(60.0, 30.0), p(61.0, 30.0)),
            (p(0.0, 10.0), p(0.0, 20.0)),
            (p(59.93, 30.31), p(59.94, 30.33)),
            (p(-33.9, 151.2), p(-33.91, 151.19)),
        ];
        for (a, b) in pairs {
            let forward = orthodromic_bearing(&a, &b);
            let back = orthodromic_bearing(&b, &a);
            let diff = (forward - back - Angle::from_radians(PI)).radians();
            assert!(diff.abs() < 1e-3, "{a} {b}: {diff}");
        }
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let start = p(59.9, 30.3).with_altitude(Altitude::from_meters(12.0));
        let bearing = Angle::from_degrees(37.0);
        let dist = Distance::from_kilometers(25.0);
        let end = orthodromic_destination(&start, bearing, dist);
        assert!((orthodromic_distance(&start, &end).kilometers() - 25.0).abs() < 1e-6);
        assert!(orthodromic_bearing(&start, &end).almost_equals_within(bearing, 1e-9));
        assert_eq!(end.altitude, start.altitude);
    }

    #[test]
    fn midpoint_on_equator() {
        let a = p(0.0, 0.0).with_altitude(Altitude::from_meters(100.0));
        let b = p(0.0, 10.0).with_altitude(Altitude::from_meters(300.0));
        let m = orthodromic_midpoint(&a, &b);
        assert!(m.latitude.degrees().abs() < 1e-9);
        assert!((m.longitude.degrees() - 5.0).abs() < 1e-9);
        assert!((m.altitude.meters() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn rhumb_east_west_uses_cosine_fallback() {
        let a = p(60.0, 10.0);
        let b = p(60.0, 11.0);
        let d = loxodromic_distance(&a, &b);
        assert!(d.is_finite());
        let expected = 1.0_f64.to_radians() * 60.0_f64.to_radians().cos();
        assert!((d.radians() - expected).abs() < 1e-12);
        assert!((loxodromic_bearing(&a, &b).degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn rhumb_takes_short_way_across_antimeridian() {
        let a = p(0.0, 179.0);
        let b = p(0.0, -179.0);
        assert!((loxodromic_bearing(&a, &b).degrees() - 90.0).abs() < 1e-9);
        assert!((loxodromic_distance(&a, &b).radians() - 2.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn rhumb_along_meridian_matches_great_circle() {
        let a = p(10.0, 20.0);
        let b = p(25.0, 20.0);
        let lox = loxodromic_distance(&a, &b);
        let ort = orthodromic_distance(&a, &b);
        assert!(lox.almost_equals_within(ort, 1e-12));
    }

    #[test]
    fn rhumb_destination_roundtrip() {
        let start = p(45.0, -73.0);
        let bearing = Angle::from_degrees(-120.0);
        let dist = Distance::from_kilometers(300.0);
        let end = loxodromic_destination(&start, bearing, dist);
        assert!((loxodromic_distance(&start, &end).kilometers() - 300.0).abs() < 1e-6);
        assert!(loxodromic_bearing(&start, &end).almost_equals_within(bearing, 1e-9));
    }

    #[test]
    fn rhumb_is_never_shorter_than_great_circle() {
        let a = p(40.0, -74.0);
        let b = p(51.5, -0.1);
        assert!(loxodromic_distance(&a, &b) >= orthodromic_distance(&a, &b));
    }

    #[test]
    fn mercator_close_to_orthodromic_over_short_range() {
        let a = p(59.93, 30.31);
        let b = p(59.935, 30.32);
        let m = mercator_distance(&a, &b).meters();
        let o = orthodromic_distance(&a, &b).meters();
        assert!((m - o).abs() / o < 0.01, "{m} vs {o}");
        let mb = mercator_bearing(&a, &b);
        let ob = orthodromic_bearing(&a, &b);
        assert!(mb.almost_equals_within(ob, 0.01));
    }

    #[test]
    fn elevation_straight_up_and_down() {
        let ground = p(10.0, 10.0);
        let above = ground.with_altitude(Altitude::from_meters(500.0));
        assert!((elevation(&ground, &above).degrees() - 90.0).abs() < 1e-9);
        assert!((elevation(&above, &ground).degrees() + 90.0).abs() < 1e-9);
        assert!((direct_distance(&ground, &above).meters() - 500.0).abs() < 1e-2);
    }

    #[test]
    fn elevation_of_coincident_points_is_zero() {
        let a = p(10.0, 10.0).with_altitude(Altitude::from_meters(50.0));
        let e = elevation(&a, &a);
        assert!(e.is_finite());
        assert_eq!(e.radians(), 0.0);
        assert_eq!(direct_distance(&a, &a).meters(), 0.0);
    }

    #[test]
    fn elevation_over_a_slope() {
        let a = p(10.0, 10.0);
        let north = orthodromic_destination(&a, Angle::ZERO, Distance::from_meters(1_000.0));
        let b = north.with_altitude(Altitude::from_meters(1_000.0));
        let e = elevation(&a, &b).degrees();
        assert!(e > 44.0 && e < 46.0, "got {e}");
    }

    #[test]
    fn distant_point_at_same_altitude_is_below_horizon() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 30.0);
        assert!(elevation(&a, &b).radians() < 0.0);
        let antipodal_side = p(0.0, 120.0);
        assert!(elevation(&a, &antipodal_side).radians() < 0.0);
    }
}

#[cfg(test)]
mod format {
    use chrono::{TimeZone, Utc};

    use crate::{Angle, NumberFormat};

    #[test]
    fn fixed_precision_degrees() {
        let f = NumberFormat::default();
        assert_eq!(f.format_degrees(Angle::from_degrees(60.0)), "60.000000");
        assert_eq!(f.format_degrees(Angle::from_degrees(-0.1234567)), "-0.123457");
    }

    #[test]
    fn rejects_comma_decimal() {
        let f = NumberFormat::default();
        assert!(f.parse_f64("1,5").is_err());
        assert_eq!(f.parse_f64(" 1.5 ").unwrap(), 1.5);
    }

    #[test]
    fn shortest_float_roundtrips_exactly() {
        let f = NumberFormat::default();
        let v = 11.111_111_111_111_1_f64;
        assert_eq!(f.parse_f64(&f.format_f64(v)).unwrap(), v);
    }

    #[test]
    fn timestamps() {
        let f = NumberFormat::default();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let text = f.format_timestamp(t);
        assert_eq!(text, "2024-05-01T12:30:05Z");
        assert_eq!(f.parse_timestamp(&text).unwrap(), t);
        assert_eq!(f.parse_optional_timestamp("").unwrap(), None);
        assert!(f.parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn booleans() {
        let f = NumberFormat::default();
        assert!(f.parse_bool("true").unwrap());
        assert!(!f.parse_bool("0").unwrap());
        assert!(f.parse_bool("yes").is_err());
    }
}
