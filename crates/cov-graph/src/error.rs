//! Graph-subsystem error type.

use thiserror::Error;

use cov_core::{CoreError, NodeId};

/// Errors produced by `cov-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{0} not found in map")]
    NodeNotFound(NodeId),

    #[error("duplicate node with OSM id {0}")]
    DuplicateNode(i64),

    #[error("way {osm_id} has {nodes} node(s); at least 2 are required")]
    DegenerateWay { osm_id: i64, nodes: usize },

    #[error("way {osm_id}: leg chain is broken")]
    BrokenChain { osm_id: i64 },

    #[error("{element}: cannot parse {key}={value:?}")]
    Parse {
        element: String,
        key:     String,
        value:   String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
