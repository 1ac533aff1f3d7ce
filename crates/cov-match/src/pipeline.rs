//! End-to-end coverage run over one map and many tracks.

use cov_graph::{restructure, Map, MapTotals, RestructureConfig, RestructureStats};

use crate::{GpsTrack, MapMatcher, MatchResult, MatchStats, MatcherConfig};

/// Result of [`CoveragePipeline::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageSummary {
    pub tracks:      usize,
    pub restructure: RestructureStats,
    pub matching:    MatchStats,
    pub totals:      MapTotals,
    pub ways:        usize,
    pub legs:        usize,
}

/// Recalculate → restructure → match every track → recalculate.
///
/// Set `restructure` to `None` for a map that was already restructured
/// (for example one read back from its persisted form).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoveragePipeline {
    pub restructure: Option<RestructureConfig>,
    pub matcher:     MatcherConfig,
}

impl Default for CoveragePipeline {
    fn default() -> Self {
        Self { restructure: Some(RestructureConfig::default()), matcher: MatcherConfig::default() }
    }
}

impl CoveragePipeline {
    pub fn new(restructure: Option<RestructureConfig>, matcher: MatcherConfig) -> Self {
        Self { restructure, matcher }
    }

    /// Run every stage in order.  Visitation state already in `map` is
    /// kept and added to.
    ///
    /// # Errors
    ///
    /// [`crate::MatchError::Graph`] if the map fails its integrity check
    /// before matching.
    pub fn run(&self, map: &mut Map, tracks: &[GpsTrack]) -> MatchResult<CoverageSummary> {
        map.recalculate();
        let restructure_stats = match &self.restructure {
            Some(config) => restructure(map, config),
            None => RestructureStats::default(),
        };
        map.validate()?;

        let mut matcher = MapMatcher::new(map, self.matcher.clone());
        let mut matching = MatchStats::default();
        for track in tracks {
            matching += matcher.match_track(map, track);
        }
        map.recalculate();

        let totals = map.totals();
        log::info!(
            "matched {} track(s): {} new leg(s) visited; target coverage {:.1}%",
            tracks.len(),
            matching.newly_visited,
            totals.target_coverage() * 100.0
        );

        Ok(CoverageSummary {
            tracks: tracks.len(),
            restructure: restructure_stats,
            matching,
            totals,
            ways: map.way_count(),
            legs: map.leg_count(),
        })
    }
}
