use crate::domain::recommendation::{OfferedProps, PropRecommendation};

/// Keeps only recommendations that exactly match an offered prop.
///
/// Passes everything through when filtering is off or nothing is offered.
pub fn filter_offered(
    ranked: Vec<PropRecommendation>,
    offered: &OfferedProps,
    filter_enabled: bool,
) -> Vec<PropRecommendation> {
    if !filter_enabled || offered.is_empty() {
        return ranked;
    }

    ranked
        .into_iter()
        .filter(|rec| offered.iter().any(|prop| prop.matches(rec)))
        .collect()
}
