//! Render option flags and the heatmap mutual-exclusion rules.

/// One of the five visualization toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFlag {
    Signals,
    Directions,
    BoundingBoxes,
    SignalLabels,
    Heatmap,
}

impl RenderFlag {
    /// The four overlay toggles that heatmap mode excludes.
    pub const OVERLAYS: [RenderFlag; 4] = [
        RenderFlag::Signals,
        RenderFlag::Directions,
        RenderFlag::BoundingBoxes,
        RenderFlag::SignalLabels,
    ];

    pub const ALL: [RenderFlag; 5] = [
        RenderFlag::Signals,
        RenderFlag::Directions,
        RenderFlag::BoundingBoxes,
        RenderFlag::SignalLabels,
        RenderFlag::Heatmap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Signals => "Signal routes",
            Self::Directions => "Direction arrows",
            Self::BoundingBoxes => "Bounding boxes",
            Self::SignalLabels => "Signal labels",
            Self::Heatmap => "Congestion heatmap",
        }
    }
}

/// The five option flags of a visualization request.
///
/// `None` means the presentation layer has no control for that flag: it
/// contributes its request-time default (`true`) but is never touched by
/// invariant repair. These two readings of "absent" are intentionally
/// different and both belong to the contract.
///
/// Invariant: `show_heatmap` and any overlay flag are never `Some(true)`
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub show_signals: Option<bool>,
    pub show_directions: Option<bool>,
    pub show_bounding_boxes: Option<bool>,
    pub show_signal_labels: Option<bool>,
    pub show_heatmap: Option<bool>,
}

impl RenderOptions {
    /// Initial page state: overlays on, heatmap off.
    pub fn with_default_controls() -> Self {
        Self {
            show_signals: Some(true),
            show_directions: Some(true),
            show_bounding_boxes: Some(true),
            show_signal_labels: Some(true),
            show_heatmap: Some(false),
        }
    }

    pub fn get(&self, flag: RenderFlag) -> Option<bool> {
        match flag {
            RenderFlag::Signals => self.show_signals,
            RenderFlag::Directions => self.show_directions,
            RenderFlag::BoundingBoxes => self.show_bounding_boxes,
            RenderFlag::SignalLabels => self.show_signal_labels,
            RenderFlag::Heatmap => self.show_heatmap,
        }
    }

    fn slot_mut(&mut self, flag: RenderFlag) -> &mut Option<bool> {
        match flag {
            RenderFlag::Signals => &mut self.show_signals,
            RenderFlag::Directions => &mut self.show_directions,
            RenderFlag::BoundingBoxes => &mut self.show_bounding_boxes,
            RenderFlag::SignalLabels => &mut self.show_signal_labels,
            RenderFlag::Heatmap => &mut self.show_heatmap,
        }
    }

    /// Set one flag, then repair the heatmap exclusion as a post-condition.
    ///
    /// The rules are evaluated on the mutated state, fire only on
    /// transitions to `true`, and a single toggle can satisfy at most one
    /// of them: heatmap turned on forces the overlays off, an overlay
    /// turned on forces heatmap off. Absent (`None`) flags stay absent.
    pub fn set(&mut self, flag: RenderFlag, enabled: bool) {
        *self.slot_mut(flag) = Some(enabled);
        if !enabled {
            return;
        }
        if self.show_heatmap == Some(true) {
            if flag == RenderFlag::Heatmap {
                for overlay in RenderFlag::OVERLAYS {
                    let slot = self.slot_mut(overlay);
                    if slot.is_some() {
                        *slot = Some(false);
                    }
                }
            } else {
                self.show_heatmap = Some(false);
            }
        }
    }

    /// True when no overlay is lit together with the heatmap.
    pub fn heatmap_exclusion_holds(&self) -> bool {
        self.show_heatmap != Some(true)
            || RenderFlag::OVERLAYS
                .iter()
                .all(|overlay| self.get(*overlay) != Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabling_heatmap_clears_the_overlays() {
        let mut options = RenderOptions::with_default_controls();
        assert_eq!(options.show_signal_labels, Some(true));

        options.set(RenderFlag::Heatmap, true);

        assert_eq!(options.show_heatmap, Some(true));
        assert_eq!(options.show_signals, Some(false));
        assert_eq!(options.show_directions, Some(false));
        assert_eq!(options.show_bounding_boxes, Some(false));
        assert_eq!(options.show_signal_labels, Some(false));
        assert!(options.heatmap_exclusion_holds());
    }

    #[test]
    fn enabling_any_overlay_clears_the_heatmap() {
        let mut options = RenderOptions::with_default_controls();
        options.set(RenderFlag::Heatmap, true);

        options.set(RenderFlag::Directions, true);

        assert_eq!(options.show_directions, Some(true));
        assert_eq!(options.show_heatmap, Some(false));
        assert!(options.heatmap_exclusion_holds());
    }

    #[test]
    fn disabling_a_flag_never_triggers_repair() {
        let mut options = RenderOptions::with_default_controls();
        options.set(RenderFlag::Heatmap, true);

        options.set(RenderFlag::Heatmap, false);

        // Overlays stay wherever rule A left them.
        assert_eq!(options.show_heatmap, Some(false));
        assert_eq!(options.show_signals, Some(false));
    }

    #[test]
    fn repair_is_idempotent() {
        let mut options = RenderOptions::with_default_controls();
        options.set(RenderFlag::Heatmap, true);
        let after_first = options;
        options.set(RenderFlag::Heatmap, true);
        assert_eq!(options, after_first);
    }

    #[test]
    fn absent_controls_are_never_touched_by_repair() {
        let mut options = RenderOptions {
            show_signals: Some(true),
            ..RenderOptions::default()
        };

        options.set(RenderFlag::Heatmap, true);
        assert_eq!(options.show_directions, None);
        assert_eq!(options.show_signals, Some(false));

        // Overlay turned on while the heatmap control is absent: the
        // missing flag does not participate in enforcement.
        let mut options = RenderOptions {
            show_signal_labels: Some(false),
            ..RenderOptions::default()
        };
        options.set(RenderFlag::SignalLabels, true);
        assert_eq!(options.show_heatmap, None);
    }

    #[test]
    fn invariant_holds_after_every_single_toggle() {
        let mut options = RenderOptions::with_default_controls();
        for flag in RenderFlag::ALL {
            for enabled in [true, false, true] {
                options.set(flag, enabled);
                assert!(options.heatmap_exclusion_holds(), "after {flag:?}={enabled}");
            }
        }
    }
}
