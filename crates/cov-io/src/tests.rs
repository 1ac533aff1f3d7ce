//! Unit tests for cov-io.

#[cfg(test)]
mod helpers {
    use chrono::{DateTime, Utc};

    use cov_core::geodesy::orthodromic_destination;
    use cov_core::{Angle, Coordinates, Distance, LegId, Speed};
    use cov_graph::{HighwayType, Map, NodeKind, Smoothness, Surface, WayAttributes};

    pub fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    /// Three nodes, two ways: a named primary `1 → 2` driven once and an
    /// unvisited residential `2 → 3`.
    pub fn small_map() -> Map {
        let a = Coordinates::from_degrees(60.0, 30.0);
        let b = orthodromic_destination(&a, Angle::from_degrees(90.0), Distance::from_meters(150.0));
        let c = orthodromic_destination(&b, Angle::from_degrees(0.0), Distance::from_meters(80.0));

        let mut map = Map::new();
        let n1 = map.add_node(1, a, NodeKind::Waypoint).unwrap();
        let n2 = map.add_node(2, b, NodeKind::Waypoint).unwrap();
        let n3 = map.add_node(3, c, NodeKind::Village).unwrap();

        let main = WayAttributes {
            name:       "Main & \"Co\"".to_string(),
            highway:    HighwayType::Primary,
            is_link:    false,
            surface:    Surface::Asphalt,
            smoothness: Smoothness::Good,
            lit:        true,
            lanes:      2,
            one_way:    true,
        };
        map.add_way(10, main, &[n1, n2]).unwrap();
        map.add_way(11, WayAttributes::new(HighwayType::Residential), &[n2, n3]).unwrap();

        for n in [n1, n2] {
            map.node_mut(n).mark_visited(at(60));
        }
        let leg = map.leg_mut(LegId(0));
        leg.visited = true;
        leg.visited_count = 3;
        leg.last_visited = Some(at(60));
        leg.speed = Speed::from_kilometers_per_hour(42.5);

        map.recalculate();
        map
    }
}

// ── Map XML ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod xml {
    use std::io::Cursor;

    use cov_core::{LegId, NodeId, NumberFormat, WayId};

    use super::helpers::{at, small_map};
    use crate::{load_map, read_map, save_map, write_map, IoError};

    fn to_string(map: &cov_graph::Map) -> String {
        let mut out = Vec::new();
        write_map(map, &mut out, &NumberFormat::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse(text: &str) -> Result<cov_graph::Map, IoError> {
        read_map(Cursor::new(text.as_bytes()), &NumberFormat::default())
    }

    #[test]
    fn round_trip_preserves_state() {
        let map = small_map();
        let back = parse(&to_string(&map)).unwrap();

        assert_eq!(back.node_count(), 3);
        assert_eq!(back.way_count(), 2);
        assert_eq!(back.leg_count(), 2);

        for ((_, a), (_, b)) in map.nodes().zip(back.nodes()) {
            assert_eq!(a.osm_id, b.osm_id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.visited, b.visited);
            assert_eq!(a.last_visited, b.last_visited);
            assert!((a.coords.latitude.degrees() - b.coords.latitude.degrees()).abs() < 1e-6);
            assert!((a.coords.longitude.degrees() - b.coords.longitude.degrees()).abs() < 1e-6);
        }
        for ((_, a), (_, b)) in map.ways().zip(back.ways()) {
            assert_eq!(a.osm_id, b.osm_id);
            assert_eq!(a.attrs, b.attrs);
            assert_eq!(a.visited, b.visited);
            assert_eq!(a.last_visited, b.last_visited);
            assert!((a.length.meters() - b.length.meters()).abs() < 0.5);
        }
        for ((_, a), (_, b)) in map.legs().zip(back.legs()) {
            assert_eq!(a.visited, b.visited);
            assert_eq!(a.visited_count, b.visited_count);
            assert_eq!(a.last_visited, b.last_visited);
            assert_eq!(a.speed, b.speed);
        }
        assert!(back.validate().is_ok());
    }

    #[test]
    fn written_document_shape() {
        let text = to_string(&small_map());
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<node id=\"1\" lat=\"60.000000\" lon=\"30.000000\" type=\"waypoint\""));
        assert!(text.contains("type=\"village\""));
        assert!(text.contains("name=\"Main &amp; &quot;Co&quot;\""));
        assert!(text.contains("lastVisited=\"2023-11-14T22:14:20Z\""));
        // Last nd of each way carries only the reference.
        assert!(text.contains("<nd ref=\"2\"/>"));
        assert!(text.contains("<nd ref=\"3\"/>"));
    }

    #[test]
    fn leg_state_lands_on_its_start_node() {
        let back = parse(&to_string(&small_map())).unwrap();
        let leg = back.leg(LegId(0));
        assert_eq!(back.node(leg.start).osm_id, 1);
        assert_eq!(leg.visited_count, 3);
        assert!(!back.leg(LegId(1)).visited);
        assert_eq!(back.way(WayId(0)).last_visited, Some(at(60)));
        assert!(back.node(NodeId(1)).visited);
        assert!(!back.node(NodeId(2)).visited);
    }

    #[test]
    fn optional_attributes_default() {
        let map = parse(
            r#"<map>
                 <node id="5" lat="60.0" lon="30.0"/>
                 <node id="6" lat="60.001" lon="30.0"/>
                 <way id="7"><nd ref="5"/><nd ref="6"/></way>
               </map>"#,
        )
        .unwrap();
        let way = map.way(WayId(0));
        assert_eq!(way.attrs.lanes, 0);
        assert!(!way.attrs.one_way);
        assert!(!way.visited);
        assert_eq!(way.last_visited, None);
        assert!((way.length.meters() - 111.2).abs() < 0.5);
    }

    #[test]
    fn invalid_attribute_names_the_element() {
        let err = parse(r#"<map><node id="1" lat="north" lon="30"/></map>"#).unwrap_err();
        match err {
            IoError::Attribute { element, attribute, value } => {
                assert_eq!(element, "node 1");
                assert_eq!(attribute, "lat");
                assert_eq!(value, "north");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_attribute() {
        let err = parse(r#"<map><node id="1" lat="60"/></map>"#).unwrap_err();
        assert!(matches!(err, IoError::MissingAttribute { attribute: "lon", .. }));
    }

    #[test]
    fn unknown_node_reference() {
        let err = parse(
            r#"<map><node id="1" lat="60" lon="30"/><way id="9"><nd ref="1"/><nd ref="2"/></way></map>"#,
        )
        .unwrap_err();
        assert!(matches!(err, IoError::UnknownNode { way: 9, node: 2 }));
    }

    #[test]
    fn path_variants_attach_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.xml");
        save_map(&small_map(), &path, &NumberFormat::default()).unwrap();
        let back = load_map(&path, &NumberFormat::default()).unwrap();
        assert_eq!(back.way_count(), 2);

        let missing = dir.path().join("absent.xml");
        let err = load_map(&missing, &NumberFormat::default()).unwrap_err();
        assert!(matches!(err, IoError::File { ref path, .. } if path == &missing));
        assert!(err.to_string().contains("absent.xml"));
    }
}

// ── Chains ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod export {
    use cov_core::{LegId, NumberFormat};

    use super::helpers::small_map;
    use crate::{leg_chains, unvisited_chains, visited_chains, way_chains, write_chains_csv};

    #[test]
    fn one_chain_per_way() {
        let chains = way_chains(&small_map());
        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn visited_and_unvisited_split() {
        let map = small_map();
        assert_eq!(visited_chains(&map).len(), 1);
        assert_eq!(unvisited_chains(&map).len(), 1);
        assert_eq!(visited_chains(&map)[0][0], map.node(map.leg(LegId(0)).start).coords);
    }

    #[test]
    fn runs_break_on_unselected_legs() {
        let map = small_map();
        assert!(leg_chains(&map, |_, _| false).is_empty());
        let all = leg_chains(&map, |_, _| true);
        // Runs never cross way boundaries.
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn chain_csv_rows() {
        let mut out = Vec::new();
        write_chains_csv(&way_chains(&small_map()), &mut out, &NumberFormat::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "chain,seq,lat,lon");
        assert_eq!(lines[1], "0,0,60.000000,30.000000");
        assert_eq!(lines.len(), 5);
    }
}

// ── Track CSV ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod track_csv {
    use std::io::Cursor;

    use cov_core::{CoreError, NumberFormat};
    use cov_match::{GpsFix, GpsTrack, MatchError};

    use super::helpers::at;
    use crate::{load_track_csv, read_track_csv, write_track_csv, IoError};

    const TRACK: &str = "lat,lon,time\n\
                         60.000000,30.000000,2024-05-01T10:00:00Z\n\
                         60.001000,30.000000,2024-05-01T10:00:10Z\n\
                         60.002000,30.000000,2024-05-01T12:00:20+02:00\n";

    #[test]
    fn reads_fixes_in_order() {
        let track = read_track_csv("morning", Cursor::new(TRACK), &NumberFormat::default()).unwrap();
        assert_eq!(track.name(), "morning");
        assert_eq!(track.len(), 3);
        assert_eq!(track.duration().seconds(), 20.0);
        assert!((track.length().meters() - 222.4).abs() < 0.5);
    }

    #[test]
    fn bad_timestamp_reports_row() {
        let text = "lat,lon,time\n60,30,2024-05-01T10:00:00Z\n60.001,30,yesterday\n";
        let err = read_track_csv("t", Cursor::new(text), &NumberFormat::default()).unwrap_err();
        assert!(matches!(err, IoError::Row { row: 3, source: CoreError::InvalidTimestamp { .. } }));
    }

    #[test]
    fn bad_number_is_csv_error() {
        let text = "lat,lon,time\nsixty,30,2024-05-01T10:00:00Z\n";
        let err = read_track_csv("t", Cursor::new(text), &NumberFormat::default()).unwrap_err();
        assert!(matches!(err, IoError::Csv(_)));
    }

    #[test]
    fn reversed_time_is_rejected() {
        let text = "lat,lon,time\n60,30,2024-05-01T10:00:10Z\n60.001,30,2024-05-01T10:00:00Z\n";
        let err = read_track_csv("t", Cursor::new(text), &NumberFormat::default()).unwrap_err();
        assert!(matches!(err, IoError::Track(MatchError::TimeReversed { index: 1, .. })));
    }

    #[test]
    fn written_track_reads_back() {
        let track = GpsTrack::new(
            "loop",
            vec![GpsFix::from_degrees(60.0, 30.0, at(0)), GpsFix::from_degrees(60.0005, 30.001, at(7))],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.csv");
        write_track_csv(&track, std::fs::File::create(&path).unwrap(), &NumberFormat::default()).unwrap();

        let back = load_track_csv(&path, &NumberFormat::default()).unwrap();
        assert_eq!(back.name(), "loop");
        assert_eq!(back.fixes()[1].time, at(7));
        assert!(back.fixes()[1].coords.almost_equals(&track.fixes()[1].coords));
    }
}

// ── Coverage report ───────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use cov_core::NumberFormat;
    use cov_graph::HighwayType;

    use super::helpers::{at, small_map};
    use crate::{coverage_rows, save_coverage_report, write_coverage_report};

    #[test]
    fn rows_follow_way_state() {
        let rows = coverage_rows(&small_map());
        assert_eq!(rows.len(), 2);

        let main = &rows[0];
        assert_eq!(main.osm_id, 10);
        assert_eq!(main.highway, HighwayType::Primary);
        assert!(main.target);
        assert!(main.visited);
        assert_eq!(main.last_visited, Some(at(60)));
        assert!((main.coverage() - 1.0).abs() < 1e-9);

        let side = &rows[1];
        assert!(!side.visited);
        assert_eq!(side.visited_length_m, 0.0);
        assert_eq!(side.coverage(), 0.0);
    }

    #[test]
    fn csv_layout() {
        let mut out = Vec::new();
        let n = write_coverage_report(&small_map(), &mut out, &NumberFormat::default()).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("way_id,name,highway,target,length_m,visited_length_m,coverage,visited,last_visited")
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("10,\"Main & \"\"Co\"\"\",primary,true,150.0,150.0,1.0000,true,"));
        assert!(lines.next().unwrap().ends_with(",0.0000,false,"));
    }

    #[test]
    fn save_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.csv");
        assert_eq!(save_coverage_report(&small_map(), &path, &NumberFormat::default()).unwrap(), 2);
        assert!(std::fs::read_to_string(&path).unwrap().contains("residential"));
    }
}
