//! Threshold-based prop recommendations over a player's recent games.
//!
//! Pipeline: candidate thresholds per statistic, hit counting, ranking against the
//! 60% bar, then optional filtering against offered props. Pure and synchronous.

pub mod hit_rate;
pub mod offered;
pub mod ranker;
pub mod thresholds;

use crate::domain::game::{GameRecord, StatKind};
use crate::domain::recommendation::{OfferedProps, PropRecommendation};

/// Every (statistic, candidate threshold) pair with its hit count, before ranking.
pub fn evaluate_candidates(games: &[GameRecord]) -> Vec<PropRecommendation> {
    if games.is_empty() {
        return Vec::new();
    }
    let total = games.len() as u32;

    let mut out = Vec::new();
    for kind in StatKind::ALL {
        let values: Vec<u32> = games.iter().map(|g| g.stat(kind)).collect();
        for threshold in thresholds::candidate_thresholds(&values) {
            out.push(PropRecommendation {
                prop_type: kind,
                threshold,
                hits: hit_rate::count_hits(&values, threshold),
                total,
            });
        }
    }
    out
}

/// Ranked recommendations for `games` (most recent first), optionally restricted to
/// `offered` lines. Never fails; an empty game list yields an empty result.
pub fn compute_recommendations(
    games: &[GameRecord],
    offered: &OfferedProps,
    filter_enabled: bool,
) -> Vec<PropRecommendation> {
    let ranked = ranker::rank(evaluate_candidates(games));
    let out = offered::filter_offered(ranked, offered, filter_enabled);

    tracing::debug!(
        games_len = games.len(),
        offered_len = offered.len(),
        filter_enabled,
        recommendations_len = out.len(),
        "computed prop recommendations"
    );
    out
}
