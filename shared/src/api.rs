//! Wire contract with the routing compute service and request composition.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::SignalDto;
use crate::filters::FilterPolicy;
use crate::render_options::RenderOptions;

pub const PARSE_ROUTING_ENDPOINT: &str = "/api/parse_routing";
pub const UPLOAD_ARCHITECTURE_ENDPOINT: &str = "/upload/architecture";
pub const UPLOAD_CIRCUIT_ENDPOINT: &str = "/upload/circuit";
pub const VISUALIZE_ENDPOINT: &str = "/api/visualize";
pub const CONFLICTS_ENDPOINT: &str = "/analysis/conflicts";

/// Directory prefix the service uses for generated artifacts; stripped
/// before a reference is turned into a download URL.
pub const OUTPUT_DIR_PREFIX: &str = "output";

/// Payload for `POST /api/visualize`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VisualizeRequest {
    /// Selected signal names, verbatim in catalog order.
    pub signals: Vec<String>,
    pub show_signals: bool,
    /// Grid rendering is disabled unconditionally in the request shape.
    pub show_grid: bool,
    pub show_directions: bool,
    pub show_bounding_boxes: bool,
    pub show_signal_labels: bool,
    pub show_heatmap: bool,
    pub filter_type: Option<String>,
    pub filter_value: Option<i64>,
}

/// Payload for `POST /analysis/conflicts`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConflictRequest {
    pub selected_signals: Vec<String>,
}

/// Advisory conditions raised before any request leaves the controller.
///
/// These are user-input problems, not defects: the operation simply does
/// not proceed and prior state stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    EmptySelection,
    RoutingNotLoaded,
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "Select at least one signal first"),
            Self::RoutingNotLoaded => write!(f, "Load a .route file before requesting analysis"),
        }
    }
}

/// Build a visualization request from the current selection and options.
///
/// Absent option controls default to enabled here; the consistency rules
/// have already kept the present flags coherent. The filter descriptor is
/// informational only, selection already reflects its effect.
pub fn compose_visualization(
    selected_names: &[String],
    options: &RenderOptions,
    filter: Option<(FilterPolicy, i64)>,
) -> Result<VisualizeRequest, ComposeError> {
    if selected_names.is_empty() {
        return Err(ComposeError::EmptySelection);
    }
    Ok(VisualizeRequest {
        signals: selected_names.to_vec(),
        show_signals: options.show_signals.unwrap_or(true),
        show_grid: false,
        show_directions: options.show_directions.unwrap_or(true),
        show_bounding_boxes: options.show_bounding_boxes.unwrap_or(true),
        show_signal_labels: options.show_signal_labels.unwrap_or(true),
        show_heatmap: options.show_heatmap.unwrap_or(true),
        filter_type: filter.map(|(policy, _)| policy.as_str().to_owned()),
        filter_value: filter.map(|(_, value)| value),
    })
}

/// Build a conflict-analysis request; requires a loaded routing source.
pub fn compose_conflict(
    selected_names: &[String],
    routing_loaded: bool,
) -> Result<ConflictRequest, ComposeError> {
    if !routing_loaded {
        return Err(ComposeError::RoutingNotLoaded);
    }
    if selected_names.is_empty() {
        return Err(ComposeError::EmptySelection);
    }
    Ok(ConflictRequest {
        selected_signals: selected_names.to_vec(),
    })
}

/// Response of `POST /api/parse_routing`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RoutingParseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub signals: Vec<SignalDto>,
    #[serde(default)]
    pub total_nets: Option<usize>,
    #[serde(default)]
    pub architecture: Option<ArchitectureDims>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Grid dimensions reported alongside routing parses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchitectureDims {
    pub width: u32,
    pub height: u32,
}

/// Architecture/circuit uploads: only the success flag matters to the
/// controller, the parsed content stays on the service side.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/visualize`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VisualizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub signals_visualized: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /analysis/conflicts`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConflictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub hubs: Vec<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub conflict_viz_path: Option<String>,
    #[serde(default)]
    pub num_signals: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Prefer the server-supplied message, fall back to a generic one.
pub fn server_error(error: Option<String>) -> String {
    error
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "The visualization service reported an error".to_owned())
}

/// Normalize an image reference returned by the service: unify path
/// separators and strip the output-directory prefix. Applied identically
/// to visualization and conflict-graph references.
pub fn normalize_image_reference(reference: &str) -> String {
    let unified = reference.replace('\\', "/");
    let stripped = unified
        .strip_prefix(&format!("{OUTPUT_DIR_PREFIX}/"))
        .unwrap_or(&unified);
    stripped.trim_start_matches('/').to_owned()
}

/// Download URL for an image reference, after normalization.
pub fn download_url(api_base: &str, reference: &str) -> String {
    format!(
        "{}/download/{}",
        api_base.trim_end_matches('/'),
        normalize_image_reference(reference)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_options::RenderFlag;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn empty_selection_never_produces_a_request() {
        let options = RenderOptions::with_default_controls();
        assert_eq!(
            compose_visualization(&[], &options, None),
            Err(ComposeError::EmptySelection)
        );
        assert_eq!(
            compose_conflict(&[], true),
            Err(ComposeError::EmptySelection)
        );
    }

    #[test]
    fn conflict_requires_a_loaded_routing_source() {
        assert_eq!(
            compose_conflict(&names(&["n1"]), false),
            Err(ComposeError::RoutingNotLoaded)
        );
        let request = compose_conflict(&names(&["n1"]), true).unwrap();
        assert_eq!(request.selected_signals, ["n1"]);
    }

    #[test]
    fn selection_order_is_emitted_verbatim() {
        let options = RenderOptions::with_default_controls();
        let selected = names(&["clk", "rst", "data_0"]);
        let request = compose_visualization(&selected, &options, None).unwrap();
        assert_eq!(request.signals, selected);
    }

    #[test]
    fn grid_is_hard_disabled_and_absent_controls_default_to_true() {
        let options = RenderOptions::default();
        let request = compose_visualization(&names(&["n1"]), &options, None).unwrap();
        assert!(!request.show_grid);
        assert!(request.show_signals);
        assert!(request.show_directions);
        assert!(request.show_bounding_boxes);
        assert!(request.show_signal_labels);
        assert!(request.show_heatmap);
    }

    #[test]
    fn present_flags_are_emitted_as_is() {
        let mut options = RenderOptions::with_default_controls();
        options.set(RenderFlag::Heatmap, true);
        let request = compose_visualization(&names(&["n1"]), &options, None).unwrap();
        assert!(request.show_heatmap);
        assert!(!request.show_signals);
        assert!(!request.show_signal_labels);
    }

    #[test]
    fn filter_descriptor_is_echoed_informationally() {
        let options = RenderOptions::with_default_controls();
        let request =
            compose_visualization(&names(&["n1"]), &options, Some((FilterPolicy::MoreThan, 10)))
                .unwrap();
        assert_eq!(request.filter_type.as_deref(), Some("more_than"));
        assert_eq!(request.filter_value, Some(10));

        let bare = compose_visualization(&names(&["n1"]), &options, None).unwrap();
        assert_eq!(bare.filter_type, None);
        assert_eq!(bare.filter_value, None);
    }

    #[test]
    fn image_references_are_normalized_identically() {
        assert_eq!(normalize_image_reference("output/viz.png"), "viz.png");
        assert_eq!(normalize_image_reference("output\\conflict_graph_7.png"), "conflict_graph_7.png");
        assert_eq!(normalize_image_reference("viz.png"), "viz.png");
        assert_eq!(normalize_image_reference("/viz.png"), "viz.png");
        assert_eq!(
            download_url("http://localhost:5000/", "output/viz.png"),
            "http://localhost:5000/download/viz.png"
        );
        assert_eq!(download_url("", "viz.png"), "/download/viz.png");
    }

    #[test]
    fn server_message_wins_over_the_generic_fallback() {
        assert_eq!(server_error(Some("boom".into())), "boom");
        assert_eq!(
            server_error(Some("  ".into())),
            "The visualization service reported an error"
        );
        assert_eq!(
            server_error(None),
            "The visualization service reported an error"
        );
    }

    #[test]
    fn parse_routing_response_decodes_the_service_shape() {
        let payload = r#"{
            "success": true,
            "signals": [
                {"net_name": "net_4", "segment_count": 12, "fanout": 2},
                {"net_name": "net_9", "fanout": 3}
            ],
            "total_nets": 2,
            "architecture": {"width": 10, "height": 10}
        }"#;
        let response: RoutingParseResponse = serde_json::from_str(payload).unwrap();
        assert!(response.success);
        assert_eq!(response.signals.len(), 2);
        assert_eq!(response.signals[1].segment_count, None);
        assert_eq!(response.signals[1].fanout, Some(3));
        assert_eq!(
            response.architecture,
            Some(ArchitectureDims { width: 10, height: 10 })
        );
        assert_eq!(response.error, None);
    }

    #[test]
    fn error_payload_without_success_flag_reads_as_failure() {
        // Flask error handlers answer with a bare {"error": ...} body.
        let response: UploadResponse =
            serde_json::from_str(r#"{"error": "Invalid file type - must be .route"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(
            server_error(response.error),
            "Invalid file type - must be .route"
        );
    }
}
