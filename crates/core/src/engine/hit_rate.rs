/// Games whose value meets or exceeds `threshold`.
pub fn count_hits(values: &[u32], threshold: u32) -> u32 {
    values.iter().filter(|v| **v >= threshold).count() as u32
}

/// Minimum share of games a line must hit to be recommended, as `NUM / DEN`.
pub const MIN_HIT_RATE_NUM: u64 = 3;
pub const MIN_HIT_RATE_DEN: u64 = 5;

/// `hits / total >= 3/5`, decided without floating point.
pub fn meets_min_hit_rate(hits: u32, total: u32) -> bool {
    total > 0 && u64::from(hits) * MIN_HIT_RATE_DEN >= u64::from(total) * MIN_HIT_RATE_NUM
}
