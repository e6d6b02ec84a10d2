//! Filter engine: bulk selection policies over the signal catalog.

use indexmap::IndexMap;

use crate::catalog::SignalDescriptor;

/// Fallback when the threshold field cannot be parsed as an integer.
pub const DEFAULT_FILTER_VALUE: i64 = 10;

/// Bulk selection policy.
///
/// Stateless: every application recomputes the selection from the catalog
/// alone, so filters never compose across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    #[default]
    None,
    First,
    Last,
    LessThan,
    MoreThan,
}

impl FilterPolicy {
    pub const ALL: [FilterPolicy; 5] = [
        FilterPolicy::None,
        FilterPolicy::First,
        FilterPolicy::Last,
        FilterPolicy::LessThan,
        FilterPolicy::MoreThan,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "none" => Some(Self::None),
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            "less_than" => Some(Self::LessThan),
            "more_than" => Some(Self::MoreThan),
            _ => None,
        }
    }

    /// Wire name; the compute service echoes it back on render labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::First => "first",
            Self::Last => "last",
            Self::LessThan => "less_than",
            Self::MoreThan => "more_than",
        }
    }

    /// Human label for the policy picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "All",
            Self::First => "First N",
            Self::Last => "Last N",
            Self::LessThan => "< N segments",
            Self::MoreThan => "> N segments",
        }
    }
}

/// Parse the raw threshold field. Unparsable input falls back to
/// [`DEFAULT_FILTER_VALUE`]; non-positive values are accepted as-is.
pub fn parse_filter_value(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(DEFAULT_FILTER_VALUE)
}

/// How a filter application turned out, for presentation feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub included: usize,
    pub excluded: usize,
}

/// Recompute the whole selection from the catalog and a policy.
///
/// Every policy except `None` starts from all-excluded and applies its
/// inclusion rule; the previous selection never leaks in. `First`/`Last`
/// counts clamp to the catalog size, and thresholds compare as signed
/// values against the non-negative segment counts.
pub fn apply_filter(
    catalog: &[SignalDescriptor],
    policy: FilterPolicy,
    value: i64,
) -> (IndexMap<String, bool>, FilterSummary) {
    let len = catalog.len();
    let keep = clamp_count(value, len);

    let selection: IndexMap<String, bool> = catalog
        .iter()
        .enumerate()
        .map(|(index, signal)| {
            let included = match policy {
                FilterPolicy::None => true,
                FilterPolicy::First => index < keep,
                FilterPolicy::Last => index >= len - keep,
                FilterPolicy::LessThan => i64::from(signal.segment_count) < value,
                FilterPolicy::MoreThan => i64::from(signal.segment_count) > value,
            };
            (signal.name.clone(), included)
        })
        .collect();

    let included = selection.values().filter(|included| **included).count();
    let summary = FilterSummary {
        included,
        excluded: len - included,
    };
    (selection, summary)
}

// Negative counts select nothing rather than erroring; thresholds are
// deliberately permissive.
fn clamp_count(value: i64, len: usize) -> usize {
    usize::try_from(value).unwrap_or(0).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(counts: &[u32]) -> Vec<SignalDescriptor> {
        counts
            .iter()
            .enumerate()
            .map(|(index, count)| SignalDescriptor {
                name: format!("s{index}"),
                segment_count: *count,
            })
            .collect()
    }

    fn selected(selection: &IndexMap<String, bool>) -> Vec<&str> {
        selection
            .iter()
            .filter(|(_, included)| **included)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    // The worked example: 12 signals with segment counts
    // [2, 5, 9, 1, 14, 3, 7, 20, 0, 11, 6, 4].
    const EXAMPLE: [u32; 12] = [2, 5, 9, 1, 14, 3, 7, 20, 0, 11, 6, 4];

    #[test]
    fn first_five_selects_the_first_five_in_catalog_order() {
        let catalog = catalog(&EXAMPLE);
        let (selection, summary) = apply_filter(&catalog, FilterPolicy::First, 5);
        assert_eq!(selected(&selection), ["s0", "s1", "s2", "s3", "s4"]);
        assert_eq!(summary, FilterSummary { included: 5, excluded: 7 });
    }

    #[test]
    fn more_than_ten_selects_exactly_the_heavy_signals() {
        let catalog = catalog(&EXAMPLE);
        let (selection, summary) = apply_filter(&catalog, FilterPolicy::MoreThan, 10);
        assert_eq!(selected(&selection), ["s4", "s7", "s9"]);
        assert_eq!(summary, FilterSummary { included: 3, excluded: 9 });
    }

    #[test]
    fn last_clamps_to_catalog_size() {
        let catalog = catalog(&[1, 2, 3]);
        let (selection, summary) = apply_filter(&catalog, FilterPolicy::Last, 99);
        assert_eq!(selected(&selection), ["s0", "s1", "s2"]);
        assert_eq!(summary.included, 3);
    }

    #[test]
    fn last_two_selects_the_tail() {
        let catalog = catalog(&[1, 2, 3, 4]);
        let (selection, _) = apply_filter(&catalog, FilterPolicy::Last, 2);
        assert_eq!(selected(&selection), ["s2", "s3"]);
    }

    #[test]
    fn none_policy_includes_everything() {
        let catalog = catalog(&EXAMPLE);
        let (selection, summary) = apply_filter(&catalog, FilterPolicy::None, 0);
        assert_eq!(summary.excluded, 0);
        assert!(selection.values().all(|included| *included));
    }

    #[test]
    fn thresholds_partition_the_catalog() {
        // less_than ∪ more_than ∪ {segment_count == n} covers the catalog,
        // and the two filtered sets are disjoint.
        let catalog = catalog(&EXAMPLE);
        for n in [-3, 0, 5, 6, 10, 25] {
            let (below, _) = apply_filter(&catalog, FilterPolicy::LessThan, n);
            let (above, _) = apply_filter(&catalog, FilterPolicy::MoreThan, n);
            for signal in &catalog {
                let is_below = below[&signal.name];
                let is_above = above[&signal.name];
                assert!(!(is_below && is_above));
                let at_threshold = i64::from(signal.segment_count) == n;
                assert!(is_below || is_above || at_threshold);
            }
        }
    }

    #[test]
    fn negative_first_count_selects_nothing() {
        let catalog = catalog(&[1, 2, 3]);
        let (selection, summary) = apply_filter(&catalog, FilterPolicy::First, -2);
        assert!(selected(&selection).is_empty());
        assert_eq!(summary, FilterSummary { included: 0, excluded: 3 });
    }

    #[test]
    fn policy_wire_names_round_trip() {
        for policy in FilterPolicy::ALL {
            assert_eq!(FilterPolicy::parse(policy.as_str()), Some(policy));
        }
        assert_eq!(FilterPolicy::parse("bogus"), None);
    }

    #[test]
    fn unparsable_threshold_falls_back_to_ten() {
        assert_eq!(parse_filter_value("abc"), DEFAULT_FILTER_VALUE);
        assert_eq!(parse_filter_value(""), DEFAULT_FILTER_VALUE);
        assert_eq!(parse_filter_value(" 7 "), 7);
        assert_eq!(parse_filter_value("-4"), -4);
    }

    #[test]
    fn filter_on_empty_catalog_is_a_no_op() {
        let (selection, summary) = apply_filter(&[], FilterPolicy::First, 5);
        assert!(selection.is_empty());
        assert_eq!(summary, FilterSummary { included: 0, excluded: 0 });
    }
}
