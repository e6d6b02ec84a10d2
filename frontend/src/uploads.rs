//! Upload flows for the three design artifacts.
//!
//! Uploads run as browser tasks; a single in-progress guard rejects a
//! concurrent attempt instead of queuing or cancelling it. Validation
//! failures and backend errors surface as toasts and leave all prior state
//! untouched.

use zoon::{Mutable, Signal, SignalExt, Task, map_ref};

use shared::SignalDescriptor;
use shared::api::{self, ArchitectureDims};

use crate::connection::BackendConnection;
use crate::error_display::{ErrorAlert, ErrorDisplay};
use crate::signal_selection::SignalSelection;

/// Artifact kinds the service accepts, with their extension contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Architecture,
    Circuit,
    Routing,
}

impl ArtifactKind {
    fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Architecture => &["xml"],
            Self::Circuit => &["v", "blif"],
            Self::Routing => &["route"],
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Architecture => "device architecture file (.xml)",
            Self::Circuit => "circuit file (.v or .blif)",
            Self::Routing => "routing file (.route)",
        }
    }
}

fn has_allowed_extension(filename: &str, allowed: &[&str]) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| {
            allowed
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct Uploads {
    upload_in_progress: Mutable<bool>,
    routing_loaded: Mutable<bool>,
    architecture_loaded: Mutable<bool>,
    circuit_loaded: Mutable<bool>,
    routing_filename: Mutable<Option<String>>,
    architecture_dims: Mutable<Option<ArchitectureDims>>,
    total_nets: Mutable<Option<usize>>,
    connection: BackendConnection,
    selection: SignalSelection,
    errors: ErrorDisplay,
}

impl Uploads {
    pub fn new(
        connection: BackendConnection,
        selection: SignalSelection,
        errors: ErrorDisplay,
    ) -> Self {
        Self {
            upload_in_progress: Mutable::new(false),
            routing_loaded: Mutable::new(false),
            architecture_loaded: Mutable::new(false),
            circuit_loaded: Mutable::new(false),
            routing_filename: Mutable::new(None),
            architecture_dims: Mutable::new(None),
            total_nets: Mutable::new(None),
            connection,
            selection,
            errors,
        }
    }

    pub fn routing_loaded(&self) -> bool {
        self.routing_loaded.get()
    }

    pub fn upload_in_progress_signal(&self) -> impl Signal<Item = bool> {
        self.upload_in_progress.signal()
    }

    pub fn routing_status_signal(&self) -> impl Signal<Item = String> {
        map_ref! {
            let filename = self.routing_filename.signal_cloned(),
            let nets = self.total_nets.signal() =>
            match (filename.as_deref(), *nets) {
                (Some(name), Some(count)) => format!("{name} — {count} nets"),
                (Some(name), None) => name.to_owned(),
                _ => "Not loaded".to_owned(),
            }
        }
    }

    pub fn architecture_status_signal(&self) -> impl Signal<Item = String> {
        map_ref! {
            let loaded = self.architecture_loaded.signal(),
            let dims = self.architecture_dims.signal() =>
            match (*loaded, *dims) {
                (true, Some(dims)) => format!("{}×{} grid loaded", dims.width, dims.height),
                (true, None) => "Loaded".to_owned(),
                (false, Some(dims)) => format!("{}×{} grid (from routing)", dims.width, dims.height),
                (false, None) => "Not loaded".to_owned(),
            }
        }
    }

    pub fn circuit_status_signal(&self) -> impl Signal<Item = String> {
        self.circuit_loaded.signal().map(|loaded| {
            if loaded {
                "Loaded".to_owned()
            } else {
                "Optional — not loaded".to_owned()
            }
        })
    }

    pub fn routing_file_picked(&self, file: Option<web_sys::File>) {
        self.upload(ArtifactKind::Routing, file);
    }

    pub fn architecture_file_picked(&self, file: Option<web_sys::File>) {
        self.upload(ArtifactKind::Architecture, file);
    }

    pub fn circuit_file_picked(&self, file: Option<web_sys::File>) {
        self.upload(ArtifactKind::Circuit, file);
    }

    fn upload(&self, kind: ArtifactKind, file: Option<web_sys::File>) {
        let Some(file) = file else {
            self.errors.raise(ErrorAlert::advisory(format!(
                "Choose a {} first",
                kind.description()
            )));
            return;
        };
        let filename = file.name();
        if !has_allowed_extension(&filename, kind.allowed_extensions()) {
            self.errors.raise(ErrorAlert::advisory(format!(
                "{filename} is not a {}",
                kind.description()
            )));
            return;
        }
        if !self.try_begin_upload() {
            self.errors
                .raise(ErrorAlert::advisory("An upload is already in progress"));
            return;
        }

        let this = self.clone();
        Task::start(async move {
            match kind {
                ArtifactKind::Routing => this.run_routing_upload(file, filename).await,
                ArtifactKind::Architecture | ArtifactKind::Circuit => {
                    this.run_simple_upload(kind, file, filename).await;
                }
            }
            this.upload_in_progress.set(false);
        });
    }

    // Non-reentrancy lock, not a work queue: a second attempt while one is
    // in flight is rejected outright.
    fn try_begin_upload(&self) -> bool {
        let mut in_progress = self.upload_in_progress.lock_mut();
        if *in_progress {
            return false;
        }
        *in_progress = true;
        true
    }

    async fn run_routing_upload(&self, file: web_sys::File, filename: String) {
        match self.connection.parse_routing(file).await {
            Ok(response) if response.success => {
                let signals: Vec<SignalDescriptor> = response
                    .signals
                    .into_iter()
                    .map(SignalDescriptor::from)
                    .collect();
                let parsed = signals.len();

                self.total_nets.set(response.total_nets.or(Some(parsed)));
                if response.architecture.is_some() {
                    self.architecture_dims.set(response.architecture);
                }
                self.routing_loaded.set(true);
                self.routing_filename.set(Some(filename.clone()));
                self.selection.catalog_installed_relay.send(signals);

                self.errors.raise(ErrorAlert::success(
                    "Routing parsed",
                    format!("{filename}: {parsed} signals ready for selection"),
                ));
            }
            Ok(response) => self
                .errors
                .raise(ErrorAlert::upload_error(&filename, api::server_error(response.error))),
            Err(error) => self.errors.raise(ErrorAlert::upload_error(&filename, error)),
        }
    }

    async fn run_simple_upload(&self, kind: ArtifactKind, file: web_sys::File, filename: String) {
        let result = match kind {
            ArtifactKind::Architecture => self.connection.upload_architecture(file).await,
            _ => self.connection.upload_circuit(file).await,
        };
        match result {
            Ok(response) if response.success => {
                let what = match kind {
                    ArtifactKind::Architecture => {
                        self.architecture_loaded.set(true);
                        "Architecture"
                    }
                    _ => {
                        self.circuit_loaded.set(true);
                        "Circuit"
                    }
                };
                self.errors
                    .raise(ErrorAlert::success(format!("{what} loaded"), filename));
            }
            Ok(response) => self
                .errors
                .raise(ErrorAlert::upload_error(&filename, api::server_error(response.error))),
            Err(error) => self.errors.raise(ErrorAlert::upload_error(&filename, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_checks_are_case_insensitive_and_exact() {
        assert!(has_allowed_extension("top.route", &["route"]));
        assert!(has_allowed_extension("TOP.ROUTE", &["route"]));
        assert!(has_allowed_extension("design.BLIF", &["v", "blif"]));
        assert!(!has_allowed_extension("top.route.txt", &["route"]));
        assert!(!has_allowed_extension("route", &["route"]));
        assert!(!has_allowed_extension("archive.xml.gz", &["xml"]));
    }
}
