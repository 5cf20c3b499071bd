use crate::domain::game::StatKind;
use crate::engine::hit_rate::meets_min_hit_rate;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A prop line a sportsbook lists, as declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferedProp {
    #[serde(alias = "propType")]
    pub prop_type: StatKind,
    pub threshold: u32,
}

impl OfferedProp {
    pub fn new(prop_type: StatKind, threshold: u32) -> Self {
        Self {
            prop_type,
            threshold,
        }
    }

    /// Exact match on (type, threshold). Nearby thresholds never match.
    pub fn matches(&self, rec: &PropRecommendation) -> bool {
        self.prop_type == rec.prop_type && self.threshold == rec.threshold
    }

    pub fn label(&self) -> String {
        format!("{} {}+", self.prop_type.display_name(), self.threshold)
    }
}

/// Accepts `points:20`, `points 20`, and the label form `Points 20+`.
impl FromStr for OfferedProp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('+').unwrap_or(trimmed);
        let (kind, threshold) = trimmed
            .split_once(':')
            .or_else(|| trimmed.rsplit_once(char::is_whitespace))
            .with_context(|| format!("offered prop must look like TYPE:THRESHOLD (got {s:?})"))?;

        let prop_type = kind.parse::<StatKind>()?;
        let threshold = threshold.trim();
        ensure!(
            !threshold.is_empty() && threshold.bytes().all(|b| b.is_ascii_digit()),
            "threshold must be a non-negative integer (got {threshold:?})"
        );
        let threshold = threshold
            .parse::<u32>()
            .with_context(|| format!("threshold out of range: {threshold}"))?;

        Ok(Self::new(prop_type, threshold))
    }
}

/// Caller-maintained list of offered props, kept in insertion order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferedProps(Vec<OfferedProp>);

impl OfferedProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical (type, threshold) pair is already present.
    pub fn add(&mut self, prop: OfferedProp) -> bool {
        if self.0.contains(&prop) {
            return false;
        }
        self.0.push(prop);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<OfferedProp> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OfferedProp> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[OfferedProp] {
        &self.0
    }
}

impl FromIterator<OfferedProp> for OfferedProps {
    fn from_iter<I: IntoIterator<Item = OfferedProp>>(iter: I) -> Self {
        let mut out = Self::new();
        for prop in iter {
            out.add(prop);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::VeryHigh => "Very High",
            Confidence::High => "High",
            Confidence::Moderate => "Moderate",
            Confidence::Low => "Low",
        };
        f.write_str(s)
    }
}

/// "Threshold hit in `hits` of the last `total` games" for one statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropRecommendation {
    pub prop_type: StatKind,
    pub threshold: u32,
    pub hits: u32,
    pub total: u32,
}

impl PropRecommendation {
    pub fn hit_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.hits) / f64::from(self.total)
    }

    pub fn hit_rate_percent(&self) -> u32 {
        (self.hit_rate() * 100.0).round() as u32
    }

    pub fn confidence(&self) -> Confidence {
        // Moderate starts exactly at the recommendation bar; no floats.
        let (hits, total) = (u64::from(self.hits), u64::from(self.total));
        if total > 0 && hits == total {
            Confidence::VeryHigh
        } else if hits * 5 >= total * 4 && total > 0 {
            Confidence::High
        } else if meets_min_hit_rate(self.hits, self.total) {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}+", self.prop_type.display_name(), self.threshold)
    }
}

impl fmt::Display for PropRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hit in {}/{} games ({}%, {} confidence)",
            self.label(),
            self.hits,
            self.total,
            self.hit_rate_percent(),
            self.confidence()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::game::MAX_GAMES;
    use serde_json::json;

    fn rec(prop_type: StatKind, threshold: u32, hits: u32, total: u32) -> PropRecommendation {
        PropRecommendation {
            prop_type,
            threshold,
            hits,
            total,
        }
    }

    #[test]
    fn parses_offered_prop_forms() {
        let expected = OfferedProp::new(StatKind::Points, 20);
        assert_eq!("points:20".parse::<OfferedProp>().unwrap(), expected);
        assert_eq!("Points 20+".parse::<OfferedProp>().unwrap(), expected);
        assert_eq!(" POINTS : 20 ".parse::<OfferedProp>().unwrap(), expected);
        assert_eq!(
            "threesMade:3".parse::<OfferedProp>().unwrap(),
            OfferedProp::new(StatKind::Threes, 3)
        );
    }

    #[test]
    fn rejects_negative_or_non_numeric_thresholds() {
        assert!("points:-3".parse::<OfferedProp>().is_err());
        assert!("points:abc".parse::<OfferedProp>().is_err());
        assert!("points".parse::<OfferedProp>().is_err());
        assert!("blocks:2".parse::<OfferedProp>().is_err());
    }

    #[test]
    fn deserializes_camel_case_and_mixed_case_prop_type() {
        let prop: OfferedProp =
            serde_json::from_value(json!({"propType": "Rebounds", "threshold": 8})).unwrap();
        assert_eq!(prop, OfferedProp::new(StatKind::Rebounds, 8));

        let res = serde_json::from_value::<OfferedProp>(json!({"prop_type": "points", "threshold": -1}));
        assert!(res.is_err());
    }

    #[test]
    fn offered_props_skip_duplicates_and_remove_by_index() {
        let mut props = OfferedProps::new();
        assert!(props.add(OfferedProp::new(StatKind::Points, 20)));
        assert!(!props.add(OfferedProp::new(StatKind::Points, 20)));
        assert!(props.add(OfferedProp::new(StatKind::Assists, 5)));
        assert_eq!(props.len(), 2);

        assert_eq!(props.remove(5), None);
        assert_eq!(props.remove(0), Some(OfferedProp::new(StatKind::Points, 20)));
        assert_eq!(props.as_slice(), &[OfferedProp::new(StatKind::Assists, 5)]);
    }

    #[test]
    fn matching_is_exact_on_type_and_threshold() {
        let offered = OfferedProp::new(StatKind::Points, 15);
        assert!(offered.matches(&rec(StatKind::Points, 15, 5, 5)));
        assert!(!offered.matches(&rec(StatKind::Points, 16, 5, 5)));
        assert!(!offered.matches(&rec(StatKind::Rebounds, 15, 5, 5)));
    }

    #[test]
    fn confidence_bands_follow_hit_rate() {
        assert_eq!(rec(StatKind::Points, 10, 5, 5).confidence(), Confidence::VeryHigh);
        assert_eq!(rec(StatKind::Points, 10, 4, 5).confidence(), Confidence::High);
        assert_eq!(rec(StatKind::Points, 10, 3, 5).confidence(), Confidence::Moderate);
        assert_eq!(rec(StatKind::Points, 10, 2, 5).confidence(), Confidence::Low);
        assert_eq!(rec(StatKind::Points, 10, 2, 3).confidence(), Confidence::Moderate);
        assert_eq!(rec(StatKind::Points, 10, 0, 0).confidence(), Confidence::Low);
    }

    #[test]
    fn moderate_band_starts_at_the_recommendation_bar() {
        for total in 1..=MAX_GAMES as u32 {
            for hits in 0..=total {
                let r = rec(StatKind::Assists, 4, hits, total);
                assert_eq!(
                    r.confidence() != Confidence::Low,
                    meets_min_hit_rate(hits, total),
                    "{hits}/{total}"
                );
            }
        }
    }

    #[test]
    fn offered_prop_label_matches_recommendation_label() {
        let offered = OfferedProp::new(StatKind::Threes, 3);
        assert_eq!(offered.label(), "Threes 3+");
        assert_eq!(offered.label(), rec(StatKind::Threes, 3, 2, 3).label());
    }

    #[test]
    fn labels_and_percentages() {
        let r = rec(StatKind::Threes, 3, 2, 3);
        assert_eq!(r.label(), "Threes 3+");
        assert_eq!(r.hit_rate_percent(), 67);
        assert_eq!(
            r.to_string(),
            "Threes 3+ hit in 2/3 games (67%, Moderate confidence)"
        );
    }
}
