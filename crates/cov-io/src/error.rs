//! Error types for cov-io.

use std::path::PathBuf;

use thiserror::Error;

use cov_core::CoreError;
use cov_graph::GraphError;
use cov_match::MatchError;

/// Errors raised while reading or writing maps, tracks, and reports.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("<{element}>: invalid {attribute}={value:?}")]
    Attribute {
        element:   String,
        attribute: String,
        value:     String,
    },

    #[error("<{element}>: missing attribute {attribute}")]
    MissingAttribute { element: String, attribute: &'static str },

    #[error("way {way}: references undefined node {node}")]
    UnknownNode { way: i64, node: i64 },

    #[error("row {row}: {source}")]
    Row {
        row:    u64,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Track(#[from] MatchError),

    #[error("{}: {source}", path.display())]
    File {
        path:   PathBuf,
        #[source]
        source: Box<IoError>,
    },
}

impl IoError {
    /// Attach the file a failure came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> IoError {
        IoError::File { path: path.into(), source: Box::new(self) }
    }
}

/// Alias for `Result<T, IoError>`.
pub type IoResult<T> = Result<T, IoError>;
