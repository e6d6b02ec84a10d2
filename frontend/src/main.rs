//! RouteScope entry point.

use zoon::*;

mod app;
mod config;
mod connection;
mod dataflow;
mod error_display;
mod signal_selection;
mod uploads;
mod views;
mod visualization;

fn main() {
    let app = app::RouteScopeApp::new();
    start_app("app", move || app.root());
}
