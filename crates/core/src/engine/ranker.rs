use crate::domain::recommendation::PropRecommendation;
use crate::engine::hit_rate::meets_min_hit_rate;
use std::cmp::Ordering;

/// Drops lines under the hit-rate bar and orders the rest.
///
/// Order: hit rate desc, threshold desc, then statistic in canonical order.
pub fn rank(candidates: Vec<PropRecommendation>) -> Vec<PropRecommendation> {
    let mut out: Vec<_> = candidates
        .into_iter()
        .filter(|r| meets_min_hit_rate(r.hits, r.total))
        .collect();
    out.sort_by(compare);
    out
}

fn compare(a: &PropRecommendation, b: &PropRecommendation) -> Ordering {
    // a.hits/a.total vs b.hits/b.total by cross-multiplication.
    let rate_a = u64::from(a.hits) * u64::from(b.total);
    let rate_b = u64::from(b.hits) * u64::from(a.total);
    rate_b
        .cmp(&rate_a)
        .then_with(|| b.threshold.cmp(&a.threshold))
        .then_with(|| a.prop_type.cmp(&b.prop_type))
}
