//! Runtime configuration for the controller.

/// Where the routing compute service lives.
///
/// Nothing here persists: selection and render options are page-session
/// state by design, and the service address is fixed at startup. An empty
/// `api_base` means same-origin.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
        }
    }
}
