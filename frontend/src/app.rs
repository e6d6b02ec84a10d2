//! Application root: one instance owns every domain.

use zoon::*;

use crate::config::AppConfig;
use crate::connection::BackendConnection;
use crate::error_display::ErrorDisplay;
use crate::signal_selection::SignalSelection;
use crate::uploads::Uploads;
use crate::visualization::Visualization;

/// Self-contained RouteScope application.
///
/// Domains are plain cloneable handles; the element tree holds clones of
/// whatever it binds to, which keeps the actors alive for the page
/// session.
#[derive(Clone)]
pub struct RouteScopeApp {
    pub errors: ErrorDisplay,
    pub selection: SignalSelection,
    pub uploads: Uploads,
    pub visualization: Visualization,
}

impl RouteScopeApp {
    pub fn new() -> Self {
        let config = AppConfig::default();
        let connection = BackendConnection::new(&config);
        let errors = ErrorDisplay::new();
        let selection = SignalSelection::new(&errors);
        let uploads = Uploads::new(connection.clone(), selection.clone(), errors.clone());
        let visualization =
            Visualization::new(connection, selection.clone(), uploads.clone(), errors.clone());

        Self {
            errors,
            selection,
            uploads,
            visualization,
        }
    }

    pub fn root(&self) -> impl Element {
        crate::views::root(self)
    }
}
