//! Shared domain core for RouteScope.
//!
//! Everything in this crate is pure: the signal catalog with its selection
//! state, the filter engine, the render-option consistency rules, and the
//! request/response payloads exchanged with the routing compute service.
//! The frontend wraps these types in reactive domains; nothing here touches
//! the DOM or the network, which keeps the whole core testable on the
//! native target.

pub mod api;
pub mod catalog;
pub mod filters;
pub mod render_options;

pub use catalog::{SignalDescriptor, SignalDto, SignalWorkbench};
pub use filters::{DEFAULT_FILTER_VALUE, FilterPolicy, FilterSummary};
pub use render_options::{RenderFlag, RenderOptions};
