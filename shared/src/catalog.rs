//! Signal catalog, selection state, and the workbench context object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filters::{self, FilterPolicy, FilterSummary};
use crate::render_options::{RenderFlag, RenderOptions};

/// One routed net exactly as the parser service reports it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignalDto {
    pub net_name: String,
    #[serde(default)]
    pub segment_count: Option<u32>,
    #[serde(default)]
    pub fanout: Option<u32>,
}

/// Normalized catalog entry.
///
/// The routing-complexity metric falls back from `segment_count` to
/// `fanout` to zero. This conversion is the only place the fallback chain
/// is applied; everything downstream reads the normalized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDescriptor {
    pub name: String,
    pub segment_count: u32,
}

impl From<SignalDto> for SignalDescriptor {
    fn from(dto: SignalDto) -> Self {
        Self {
            name: dto.net_name,
            segment_count: dto.segment_count.or(dto.fanout).unwrap_or(0),
        }
    }
}

/// Context object owning the catalog, the selection state, and the render
/// options: everything the next visualization or conflict request is
/// composed from.
///
/// The frontend keeps exactly one instance inside an actor and routes all
/// mutations through these methods. Name uniqueness within a catalog is an
/// invariant supplied by the parser service and is not re-validated here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalWorkbench {
    catalog: Vec<SignalDescriptor>,
    selection: IndexMap<String, bool>,
    options: RenderOptions,
    last_filter: Option<(FilterPolicy, i64)>,
}

impl SignalWorkbench {
    pub fn new() -> Self {
        Self {
            options: RenderOptions::with_default_controls(),
            ..Self::default()
        }
    }

    /// Replace the catalog wholesale and start over with every signal
    /// selected. An empty list is a normal outcome and simply yields the
    /// empty state.
    pub fn install_catalog(&mut self, signals: Vec<SignalDescriptor>) {
        self.selection = signals
            .iter()
            .map(|signal| (signal.name.clone(), true))
            .collect();
        self.catalog = signals;
        self.last_filter = None;
    }

    pub fn catalog(&self) -> &[SignalDescriptor] {
        &self.catalog
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.get(name).copied().unwrap_or(false)
    }

    /// Set one signal's inclusion; unknown names are ignored.
    pub fn toggle(&mut self, name: &str, included: bool) {
        if let Some(slot) = self.selection.get_mut(name) {
            *slot = included;
        }
    }

    pub fn select_all(&mut self) {
        for slot in self.selection.values_mut() {
            *slot = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for slot in self.selection.values_mut() {
            *slot = false;
        }
    }

    /// Included names in catalog order. The request composer relies on this
    /// ordering being reproducible for identical state.
    pub fn selected_names(&self) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|signal| self.is_selected(&signal.name))
            .map(|signal| signal.name.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.values().filter(|included| **included).count()
    }

    /// Run the filter engine and adopt its result.
    pub fn apply_filter(&mut self, policy: FilterPolicy, raw_value: &str) -> FilterSummary {
        let value = filters::parse_filter_value(raw_value);
        let (selection, summary) = filters::apply_filter(&self.catalog, policy, value);
        self.selection = selection;
        self.last_filter = Some((policy, value));
        summary
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_render_flag(&mut self, flag: RenderFlag, enabled: bool) {
        self.options.set(flag, enabled);
    }

    /// Most recently applied filter, echoed informationally in
    /// visualization requests. Reset when a new catalog is installed.
    pub fn last_filter(&self) -> Option<(FilterPolicy, i64)> {
        self.last_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(names: &[&str]) -> Vec<SignalDescriptor> {
        names
            .iter()
            .map(|name| SignalDescriptor {
                name: (*name).to_owned(),
                segment_count: 1,
            })
            .collect()
    }

    #[test]
    fn normalization_falls_back_from_segment_count_to_fanout_to_zero() {
        let full = SignalDescriptor::from(SignalDto {
            net_name: "n1".into(),
            segment_count: Some(7),
            fanout: Some(3),
        });
        assert_eq!(full.segment_count, 7);

        let fanout_only = SignalDescriptor::from(SignalDto {
            net_name: "n2".into(),
            segment_count: None,
            fanout: Some(3),
        });
        assert_eq!(fanout_only.segment_count, 3);

        let bare = SignalDescriptor::from(SignalDto {
            net_name: "n3".into(),
            segment_count: None,
            fanout: None,
        });
        assert_eq!(bare.segment_count, 0);
    }

    #[test]
    fn install_selects_everything_and_is_total_over_the_catalog() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a", "b", "c"]));

        assert_eq!(workbench.len(), 3);
        assert_eq!(workbench.selected_count(), 3);
        assert_eq!(workbench.selected_names(), ["a", "b", "c"]);
    }

    #[test]
    fn install_replaces_the_previous_catalog_wholesale() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a", "b"]));
        workbench.toggle("a", false);

        workbench.install_catalog(descriptors(&["x"]));

        assert_eq!(workbench.selected_names(), ["x"]);
        assert!(!workbench.is_selected("a"));
    }

    #[test]
    fn empty_install_yields_the_empty_state_silently() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(Vec::new());
        assert!(workbench.is_empty());
        assert_eq!(workbench.selected_count(), 0);
    }

    #[test]
    fn toggling_an_unknown_name_is_a_no_op() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a"]));
        workbench.toggle("ghost", false);
        assert_eq!(workbench.selected_count(), 1);
    }

    #[test]
    fn selected_names_keep_catalog_order_after_mixed_mutations() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a", "b", "c", "d"]));
        workbench.deselect_all();
        workbench.toggle("d", true);
        workbench.toggle("b", true);
        assert_eq!(workbench.selected_names(), ["b", "d"]);
    }

    #[test]
    fn applying_a_filter_records_it_and_install_resets_it() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a", "b"]));

        let summary = workbench.apply_filter(FilterPolicy::First, "1");
        assert_eq!(summary, FilterSummary { included: 1, excluded: 1 });
        assert_eq!(workbench.last_filter(), Some((FilterPolicy::First, 1)));

        workbench.install_catalog(descriptors(&["c"]));
        assert_eq!(workbench.last_filter(), None);
    }

    #[test]
    fn filters_do_not_compose_across_invocations() {
        let mut workbench = SignalWorkbench::new();
        workbench.install_catalog(descriptors(&["a", "b", "c"]));

        workbench.apply_filter(FilterPolicy::First, "1");
        assert_eq!(workbench.selected_names(), ["a"]);

        // The second filter starts from the full catalog, not from {a}.
        workbench.apply_filter(FilterPolicy::Last, "2");
        assert_eq!(workbench.selected_names(), ["b", "c"]);
    }
}
