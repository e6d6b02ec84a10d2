//! Visualization and conflict-analysis request flows.
//!
//! Requests are composed from a snapshot of the workbench, sent as a
//! single attempt, and interpreted here: success stores the normalized
//! image reference or the conflict report, failure raises a toast and
//! leaves everything else alone.

use std::collections::BTreeMap;

use zoon::{Mutable, Signal, Task};

use shared::api;

use crate::connection::BackendConnection;
use crate::error_display::{ErrorAlert, ErrorDisplay};
use crate::signal_selection::SignalSelection;
use crate::uploads::Uploads;

/// Conflict analysis results, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictReport {
    pub hubs: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
    pub image_url: Option<String>,
    pub num_signals: Option<usize>,
}

#[derive(Clone)]
pub struct Visualization {
    image_url: Mutable<Option<String>>,
    signals_visualized: Mutable<Option<usize>>,
    conflict_report: Mutable<Option<ConflictReport>>,
    connection: BackendConnection,
    selection: SignalSelection,
    uploads: Uploads,
    errors: ErrorDisplay,
}

impl Visualization {
    pub fn new(
        connection: BackendConnection,
        selection: SignalSelection,
        uploads: Uploads,
        errors: ErrorDisplay,
    ) -> Self {
        Self {
            image_url: Mutable::new(None),
            signals_visualized: Mutable::new(None),
            conflict_report: Mutable::new(None),
            connection,
            selection,
            uploads,
            errors,
        }
    }

    pub fn image_url_signal(&self) -> impl Signal<Item = Option<String>> {
        self.image_url.signal_cloned()
    }

    pub fn signals_visualized_signal(&self) -> impl Signal<Item = Option<usize>> {
        self.signals_visualized.signal()
    }

    pub fn conflict_report_signal(&self) -> impl Signal<Item = Option<ConflictReport>> {
        self.conflict_report.signal_cloned()
    }

    /// Compose and send a visualization request for the current selection.
    pub fn visualize_requested(&self) {
        let workbench = self.selection.snapshot();
        let request = match api::compose_visualization(
            &workbench.selected_names(),
            workbench.options(),
            workbench.last_filter(),
        ) {
            Ok(request) => request,
            Err(condition) => {
                self.errors.raise(ErrorAlert::advisory(condition.to_string()));
                return;
            }
        };

        let this = self.clone();
        Task::start(async move {
            match this.connection.visualize(&request).await {
                Ok(response) if response.success => {
                    if let Some(reference) = response.image_path {
                        this.image_url
                            .set(Some(this.connection.download_url(&reference)));
                    }
                    this.signals_visualized.set(response.signals_visualized);
                }
                Ok(response) => this.errors.raise(ErrorAlert::backend_error(
                    "Visualization",
                    api::server_error(response.error),
                )),
                Err(error) => this
                    .errors
                    .raise(ErrorAlert::backend_error("Visualization", error)),
            }
        });
    }

    /// Compose and send a conflict-analysis request.
    pub fn conflicts_requested(&self) {
        let workbench = self.selection.snapshot();
        let request = match api::compose_conflict(
            &workbench.selected_names(),
            self.uploads.routing_loaded(),
        ) {
            Ok(request) => request,
            Err(condition) => {
                self.errors.raise(ErrorAlert::advisory(condition.to_string()));
                return;
            }
        };

        let this = self.clone();
        Task::start(async move {
            match this.connection.analyze_conflicts(&request).await {
                Ok(response) if response.success => {
                    let report = ConflictReport {
                        hubs: response.hubs,
                        metrics: response.metrics,
                        image_url: response
                            .conflict_viz_path
                            .map(|reference| this.connection.download_url(&reference)),
                        num_signals: response.num_signals,
                    };
                    this.conflict_report.set(Some(report));
                }
                Ok(response) => this.errors.raise(ErrorAlert::backend_error(
                    "Conflict analysis",
                    api::server_error(response.error),
                )),
                Err(error) => this
                    .errors
                    .raise(ErrorAlert::backend_error("Conflict analysis", error)),
            }
        });
    }
}
