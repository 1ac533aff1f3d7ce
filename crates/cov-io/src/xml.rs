//! Persisted map format.
//!
//! # Layout
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <map>
//!   <node id="1" lat="60.000000" lon="30.000000" type="waypoint" visited="true" lastVisited="2024-05-01T10:00:00Z"/>
//!   <way id="10" name="Main" highway="primary" link="false" surface="asphalt" smoothness="good"
//!        lighting="true" lanes="2" oneway="false" visited="true" lastVisited="2024-05-01T10:00:00Z">
//!     <nd ref="1" visited="true" count="1" lastVisited="2024-05-01T10:00:00Z" speed="11.1"/>
//!     <nd ref="2"/>
//!   </way>
//! </map>
//! ```
//!
//! Every `<nd>` except the last carries the state of the leg that starts
//! there; `speed` is in metres per second.  Empty `lastVisited` means
//! never.  Nodes must precede the ways that reference them.
//!
//! Legs, node back-references and all lengths are rebuilt on read from the
//! ordered `<nd>` list, then the map is recalculated.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};

use cov_core::{Altitude, Coordinates, NodeId, NumberFormat, Speed, WayId};
use cov_graph::{HighwayType, Map, NodeKind, Smoothness, Surface, WayAttributes};

use crate::{IoError, IoResult};

// ── Writing ───────────────────────────────────────────────────────────────────

/// Serialise `map` as XML into `out`.
pub fn write_map<W: Write>(map: &Map, out: W, format: &NumberFormat) -> IoResult<()> {
    let mut w = Writer::new_with_indent(out, b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let root = BytesStart::new("map");
    w.write_event(Event::Start(root.borrow()))?;

    for (_, node) in map.nodes() {
        let mut e = BytesStart::new("node");
        e.push_attribute(("id", node.osm_id.to_string().as_str()));
        e.push_attribute(("lat", format.format_degrees(node.coords.latitude).as_str()));
        e.push_attribute(("lon", format.format_degrees(node.coords.longitude).as_str()));
        e.push_attribute(("type", node.kind.as_str()));
        e.push_attribute(("visited", format.format_bool(node.visited)));
        e.push_attribute(("lastVisited", format.format_optional_timestamp(node.last_visited).as_str()));
        w.write_event(Event::Empty(e))?;
    }

    for (way_id, way) in map.ways() {
        let a = &way.attrs;
        let mut e = BytesStart::new("way");
        e.push_attribute(("id", way.osm_id.to_string().as_str()));
        e.push_attribute(("name", a.name.as_str()));
        e.push_attribute(("highway", a.highway.as_str()));
        e.push_attribute(("link", format.format_bool(a.is_link)));
        e.push_attribute(("surface", a.surface.as_str()));
        e.push_attribute(("smoothness", a.smoothness.as_str()));
        e.push_attribute(("lighting", format.format_bool(a.lit)));
        e.push_attribute(("lanes", a.lanes.to_string().as_str()));
        e.push_attribute(("oneway", format.format_bool(a.one_way)));
        e.push_attribute(("visited", format.format_bool(way.visited)));
        e.push_attribute(("lastVisited", format.format_optional_timestamp(way.last_visited).as_str()));
        w.write_event(Event::Start(e.borrow()))?;

        for &leg_id in way.legs() {
            let leg = map.leg(leg_id);
            let mut nd = BytesStart::new("nd");
            nd.push_attribute(("ref", map.node(leg.start).osm_id.to_string().as_str()));
            nd.push_attribute(("visited", format.format_bool(leg.visited)));
            nd.push_attribute(("count", leg.visited_count.to_string().as_str()));
            nd.push_attribute(("lastVisited", format.format_optional_timestamp(leg.last_visited).as_str()));
            nd.push_attribute(("speed", format.format_f64(leg.speed.meters_per_second()).as_str()));
            w.write_event(Event::Empty(nd))?;
        }
        if let Some(last) = map.way_last_node(way_id) {
            let mut nd = BytesStart::new("nd");
            nd.push_attribute(("ref", map.node(last).osm_id.to_string().as_str()));
            w.write_event(Event::Empty(nd))?;
        }

        w.write_event(Event::End(e.to_end()))?;
    }

    w.write_event(Event::End(root.to_end()))?;
    w.into_inner().flush()?;
    Ok(())
}

/// Write `map` to `path`, creating or truncating the file.
pub fn save_map(map: &Map, path: &Path, format: &NumberFormat) -> IoResult<()> {
    let result = File::create(path)
        .map_err(IoError::from)
        .and_then(|file| write_map(map, BufWriter::new(file), format));
    if result.is_ok() {
        log::info!("saved {} ways to {}", map.way_count(), path.display());
    }
    result.map_err(|e| e.in_file(path))
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Attribute values of one element, unescaped.
struct Attrs {
    element: String,
    values:  Vec<(String, String)>,
}

impl Attrs {
    fn read(element: &str, start: &BytesStart<'_>) -> IoResult<Self> {
        let mut values = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?.into_owned();
            values.push((key, value));
        }
        Ok(Self { element: element.to_owned(), values })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn required(&self, key: &'static str) -> IoResult<&str> {
        self.get(key).ok_or_else(|| IoError::MissingAttribute { element: self.element.clone(), attribute: key })
    }

    /// Parse a required attribute.
    fn parse<T, E>(&self, key: &'static str, parse: impl FnOnce(&str) -> Result<T, E>) -> IoResult<T> {
        let value = self.required(key)?;
        parse(value).map_err(|_| self.invalid(key, value))
    }

    /// Parse an optional attribute, using `default` when it is absent.
    fn parse_or<T, E>(&self, key: &'static str, default: T, parse: impl FnOnce(&str) -> Result<T, E>) -> IoResult<T> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => parse(value).map_err(|_| self.invalid(key, value)),
        }
    }

    fn invalid(&self, key: &str, value: &str) -> IoError {
        IoError::Attribute { element: self.element.clone(), attribute: key.to_owned(), value: value.to_owned() }
    }

    /// Rename the element for later messages once its id is known.
    fn with_id(mut self, id: i64) -> Self {
        self.element = format!("{} {id}", self.element);
        self
    }
}

/// Leg state carried on an `<nd>`.
struct NdRecord {
    osm_ref:      i64,
    visited:      bool,
    count:        u32,
    last_visited: Option<DateTime<Utc>>,
    speed:        Speed,
}

struct PendingWay {
    osm_id:       i64,
    attrs:        WayAttributes,
    last_visited: Option<DateTime<Utc>>,
    nds:          Vec<NdRecord>,
}

fn read_node(map: &mut Map, start: &BytesStart<'_>, format: &NumberFormat) -> IoResult<()> {
    let attrs = Attrs::read("node", start)?;
    let id = attrs.parse("id", |v| v.trim().parse::<i64>())?;
    let attrs = attrs.with_id(id);
    let lat = attrs.parse("lat", |v| format.parse_degrees(v))?;
    let lon = attrs.parse("lon", |v| format.parse_degrees(v))?;
    let kind = attrs.get("type").map_or(NodeKind::Waypoint, NodeKind::from_tag);

    let node_id = map.add_node(id, Coordinates::new(lat, lon, Altitude::ZERO), kind)?;
    let node = map.node_mut(node_id);
    node.visited = attrs.parse_or("visited", false, |v| format.parse_bool(v))?;
    node.last_visited = attrs.parse_or("lastVisited", None, |v| format.parse_optional_timestamp(v))?;
    Ok(())
}

fn read_way_start(start: &BytesStart<'_>, format: &NumberFormat) -> IoResult<PendingWay> {
    let attrs = Attrs::read("way", start)?;
    let osm_id = attrs.parse("id", |v| v.trim().parse::<i64>())?;
    let attrs = attrs.with_id(osm_id);

    let way_attrs = WayAttributes {
        name:       attrs.get("name").unwrap_or_default().to_owned(),
        highway:    attrs.get("highway").map_or(HighwayType::Unknown, HighwayType::from_tag),
        is_link:    attrs.parse_or("link", false, |v| format.parse_bool(v))?,
        surface:    attrs.get("surface").map_or(Surface::Unknown, Surface::from_tag),
        smoothness: attrs.get("smoothness").map_or(Smoothness::Unknown, Smoothness::from_tag),
        lit:        attrs.parse_or("lighting", false, |v| format.parse_bool(v))?,
        lanes:      attrs.parse_or("lanes", 0, |v| v.trim().parse::<u8>())?,
        one_way:    attrs.parse_or("oneway", false, |v| format.parse_bool(v))?,
    };
    let last_visited = attrs.parse_or("lastVisited", None, |v| format.parse_optional_timestamp(v))?;
    Ok(PendingWay { osm_id, attrs: way_attrs, last_visited, nds: Vec::new() })
}

fn read_nd(way: &PendingWay, start: &BytesStart<'_>, format: &NumberFormat) -> IoResult<NdRecord> {
    let attrs = Attrs::read(&format!("nd in way {}", way.osm_id), start)?;
    Ok(NdRecord {
        osm_ref:      attrs.parse("ref", |v| v.trim().parse::<i64>())?,
        visited:      attrs.parse_or("visited", false, |v| format.parse_bool(v))?,
        count:        attrs.parse_or("count", 0, |v| v.trim().parse::<u32>())?,
        last_visited: attrs.parse_or("lastVisited", None, |v| format.parse_optional_timestamp(v))?,
        speed:        attrs.parse_or("speed", Speed::ZERO, |v| format.parse_f64(v).map(Speed::from_meters_per_second))?,
    })
}

fn finish_way(map: &mut Map, way: PendingWay) -> IoResult<()> {
    let nodes: Vec<NodeId> = way
        .nds
        .iter()
        .map(|nd| map.node_by_osm_id(nd.osm_ref).ok_or(IoError::UnknownNode { way: way.osm_id, node: nd.osm_ref }))
        .collect::<IoResult<_>>()?;
    let way_id: WayId = map.add_way(way.osm_id, way.attrs, &nodes)?;

    let legs = map.way(way_id).legs().to_vec();
    for (leg_id, nd) in legs.into_iter().zip(&way.nds) {
        let leg = map.leg_mut(leg_id);
        leg.visited = nd.visited;
        leg.visited_count = nd.count;
        leg.last_visited = nd.last_visited;
        leg.speed = nd.speed;
    }
    map.way_mut(way_id).last_visited = way.last_visited;
    Ok(())
}

/// Parse a map from XML.
pub fn read_map<R: BufRead>(input: R, format: &NumberFormat) -> IoResult<Map> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut map = Map::new();
    let mut current: Option<PendingWay> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"node" => read_node(&mut map, &e, format)?,
                b"way" => {
                    let way = read_way_start(&e, format)?;
                    if let Some(done) = current.replace(way) {
                        finish_way(&mut map, done)?;
                    }
                }
                b"nd" => {
                    if let Some(way) = current.as_mut() {
                        let nd = read_nd(way, &e, format)?;
                        way.nds.push(nd);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"way" => {
                if let Some(done) = current.take() {
                    finish_way(&mut map, done)?;
                }
            }
            _ => {}
        }
        buf.clear();
    }
    if let Some(done) = current.take() {
        finish_way(&mut map, done)?;
    }

    map.recalculate();
    Ok(map)
}

/// Read a map from `path`.
pub fn load_map(path: &Path, format: &NumberFormat) -> IoResult<Map> {
    let map = File::open(path)
        .map_err(IoError::from)
        .and_then(|file| read_map(BufReader::new(file), format))
        .map_err(|e| e.in_file(path))?;
    log::info!("loaded {} nodes, {} ways from {}", map.node_count(), map.way_count(), path.display());
    Ok(map)
}
