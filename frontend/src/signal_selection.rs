//! Signal selection domain.
//!
//! One actor owns the [`SignalWorkbench`] (catalog, selection state, and
//! render options) and every mutation flows through a relay. The pure
//! transformations live in `shared`; this module is only the reactive
//! wiring around them.

use futures::{StreamExt, select};
use zoon::{MutableExt, Signal};

use shared::{FilterPolicy, RenderFlag, RenderOptions, SignalDescriptor, SignalWorkbench};

use crate::dataflow::{Actor, Relay, relay};
use crate::error_display::{ErrorAlert, ErrorDisplay};

/// One row of the signals panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRow {
    pub name: String,
    pub segment_count: u32,
    pub included: bool,
}

/// A filter request as the UI issues it: the policy plus the raw threshold
/// text, parsed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommand {
    pub policy: FilterPolicy,
    pub raw_value: String,
}

#[derive(Clone)]
pub struct SignalSelection {
    workbench: Actor<SignalWorkbench>,

    /// Parser results installed after a successful routing upload.
    pub catalog_installed_relay: Relay<Vec<SignalDescriptor>>,
    /// User toggled one signal's inclusion.
    pub signal_toggled_relay: Relay<(String, bool)>,
    /// User clicked "Select all".
    pub select_all_clicked_relay: Relay<()>,
    /// User clicked "Deselect all".
    pub deselect_all_clicked_relay: Relay<()>,
    /// User applied a bulk filter.
    pub filter_applied_relay: Relay<FilterCommand>,
    /// User toggled one of the render option controls.
    pub render_flag_toggled_relay: Relay<(RenderFlag, bool)>,
}

impl SignalSelection {
    pub fn new(errors: &ErrorDisplay) -> Self {
        let (catalog_installed_relay, catalog_installed_stream) =
            relay::<Vec<SignalDescriptor>>();
        let (signal_toggled_relay, signal_toggled_stream) = relay::<(String, bool)>();
        let (select_all_clicked_relay, select_all_stream) = relay::<()>();
        let (deselect_all_clicked_relay, deselect_all_stream) = relay::<()>();
        let (filter_applied_relay, filter_applied_stream) = relay::<FilterCommand>();
        let (render_flag_toggled_relay, render_flag_stream) = relay::<(RenderFlag, bool)>();

        let toast_added_relay = errors.toast_added_relay.clone();

        let workbench = Actor::new(SignalWorkbench::new(), async move |state| {
            let mut catalog_installed = catalog_installed_stream.fuse();
            let mut signal_toggled = signal_toggled_stream.fuse();
            let mut select_all = select_all_stream.fuse();
            let mut deselect_all = deselect_all_stream.fuse();
            let mut filter_applied = filter_applied_stream.fuse();
            let mut render_flag = render_flag_stream.fuse();

            loop {
                select! {
                    signals = catalog_installed.next() => match signals {
                        Some(signals) => {
                            state.update_mut(|workbench| workbench.install_catalog(signals));
                        }
                        None => break,
                    },
                    toggled = signal_toggled.next() => match toggled {
                        Some((name, included)) => {
                            state.update_mut(|workbench| workbench.toggle(&name, included));
                        }
                        None => break,
                    },
                    clicked = select_all.next() => match clicked {
                        Some(()) => state.update_mut(|workbench| workbench.select_all()),
                        None => break,
                    },
                    clicked = deselect_all.next() => match clicked {
                        Some(()) => state.update_mut(|workbench| workbench.deselect_all()),
                        None => break,
                    },
                    command = filter_applied.next() => match command {
                        Some(command) => {
                            let summary = {
                                let mut workbench = state.lock_mut();
                                workbench.apply_filter(command.policy, &command.raw_value)
                            };
                            toast_added_relay.send(ErrorAlert::filter_summary(summary));
                        }
                        None => break,
                    },
                    toggled = render_flag.next() => match toggled {
                        Some((flag, enabled)) => {
                            state.update_mut(|workbench| workbench.set_render_flag(flag, enabled));
                        }
                        None => break,
                    },
                }
            }
        });

        Self {
            workbench,
            catalog_installed_relay,
            signal_toggled_relay,
            select_all_clicked_relay,
            deselect_all_clicked_relay,
            filter_applied_relay,
            render_flag_toggled_relay,
        }
    }

    pub fn rows_signal(&self) -> impl Signal<Item = Vec<SignalRow>> {
        self.workbench.signal_ref(|workbench| {
            workbench
                .catalog()
                .iter()
                .map(|signal| SignalRow {
                    name: signal.name.clone(),
                    segment_count: signal.segment_count,
                    included: workbench.is_selected(&signal.name),
                })
                .collect()
        })
    }

    pub fn selected_count_signal(&self) -> impl Signal<Item = usize> {
        self.workbench.signal_ref(SignalWorkbench::selected_count)
    }

    pub fn catalog_len_signal(&self) -> impl Signal<Item = usize> {
        self.workbench.signal_ref(SignalWorkbench::len)
    }

    pub fn options_signal(&self) -> impl Signal<Item = RenderOptions> {
        self.workbench.signal_ref(|workbench| *workbench.options())
    }

    /// Snapshot for request composition inside event handlers.
    pub fn snapshot(&self) -> SignalWorkbench {
        self.workbench.peek()
    }
}
