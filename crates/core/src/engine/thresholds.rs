use std::collections::BTreeSet;

/// Fractions of the observed maximum, in tenths (50%..90%).
const CANDIDATE_TENTHS: [u32; 5] = [5, 6, 7, 8, 9];

/// Distinct positive candidate lines derived from the largest observed value.
///
/// Each candidate is `floor(max * pct)` computed in integer arithmetic. Returned in
/// ascending order; callers re-sort anyway.
pub fn candidate_thresholds(values: &[u32]) -> BTreeSet<u32> {
    let Some(max) = values.iter().copied().max() else {
        return BTreeSet::new();
    };

    CANDIDATE_TENTHS
        .iter()
        .map(|tenths| (u64::from(max) * u64::from(*tenths) / 10) as u32)
        .filter(|t| *t > 0)
        .collect()
}
