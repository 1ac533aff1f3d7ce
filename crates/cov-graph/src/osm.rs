//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use cov_graph::osm::load_from_pbf;
//!
//! let map = load_from_pbf(Path::new("region.osm.pbf"))?;
//! ```
//!
//! Every node is buffered until the file has been read, because ways
//! reference nodes by OSM id and PBF gives no ordering guarantee.
//! Filtering happens in [`Ingest::finish`].

use std::path::Path;

use osmpbf::{Element, ElementReader};

use crate::ingest::Ingest;
use crate::{GraphError, GraphResult, Map};

/// Load a coverage map from an OSM PBF file.
///
/// # Errors
///
/// [`GraphError::Osm`] when the file cannot be opened or decoded, and any
/// ingestion error for malformed tags.
pub fn load_from_pbf(path: &Path) -> GraphResult<Map> {
    let reader = ElementReader::from_path(path).map_err(|e| GraphError::Osm(e.to_string()))?;
    let mut ingest = Ingest::new();
    // The reader callback cannot return errors, so hold the first one.
    let mut failure: Option<GraphError> = None;

    reader
        .for_each(|elem| {
            if failure.is_some() {
                return;
            }
            let result = match elem {
                Element::Node(n) => {
                    let tags: Vec<(&str, &str)> = n.tags().collect();
                    ingest.add_node(n.id(), n.lat(), n.lon(), &tags)
                }
                Element::DenseNode(n) => {
                    let tags: Vec<(&str, &str)> = n.tags().collect();
                    ingest.add_node(n.id(), n.lat(), n.lon(), &tags)
                }
                Element::Way(w) => {
                    let tags: Vec<(&str, &str)> = w.tags().collect();
                    ingest.add_way(w.id(), w.refs().collect(), &tags).map(|_| ())
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                failure = Some(e);
            }
        })
        .map_err(|e| GraphError::Osm(e.to_string()))?;

    if let Some(e) = failure {
        return Err(e);
    }
    ingest.finish()
}
