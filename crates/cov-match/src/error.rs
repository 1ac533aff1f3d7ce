//! Matching-subsystem error type.

use chrono::{DateTime, Utc};
use thiserror::Error;

use cov_graph::GraphError;

/// Errors produced by `cov-match`.
///
/// Matching itself never fails; these are raised while validating a track
/// or checking the map before a run.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("track {track:?}: fix {index} has non-finite coordinates ({lat}, {lon})")]
    NonFiniteFix {
        track: String,
        index: usize,
        lat:   f64,
        lon:   f64,
    },

    #[error("track {track:?}: fix {index} at {time} is earlier than the previous fix at {previous}")]
    TimeReversed {
        track:    String,
        index:    usize,
        previous: DateTime<Utc>,
        time:     DateTime<Utc>,
    },

    #[error("map integrity: {0}")]
    Graph(#[from] GraphError),
}

pub type MatchResult<T> = Result<T, MatchError>;
