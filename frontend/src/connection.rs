//! HTTP connection layer to the routing compute service.
//!
//! Thin wrapper over browser fetch: multipart uploads for design
//! artifacts, JSON for compute requests. Transport and decoding problems
//! fold into `Result<_, String>`; the calling domain decides how to
//! surface them.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response};

use shared::api::{
    self, ConflictRequest, ConflictResponse, RoutingParseResponse, UploadResponse,
    VisualizeRequest, VisualizeResponse,
};

use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct BackendConnection {
    api_base: String,
}

impl BackendConnection {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Download URL for an image reference returned by the service.
    pub fn download_url(&self, reference: &str) -> String {
        api::download_url(&self.api_base, reference)
    }

    pub async fn parse_routing(&self, file: web_sys::File) -> Result<RoutingParseResponse, String> {
        self.post_file(api::PARSE_ROUTING_ENDPOINT, "routing_file", file)
            .await
    }

    pub async fn upload_architecture(&self, file: web_sys::File) -> Result<UploadResponse, String> {
        self.post_file(api::UPLOAD_ARCHITECTURE_ENDPOINT, "file", file)
            .await
    }

    pub async fn upload_circuit(&self, file: web_sys::File) -> Result<UploadResponse, String> {
        self.post_file(api::UPLOAD_CIRCUIT_ENDPOINT, "file", file)
            .await
    }

    pub async fn visualize(
        &self,
        request: &VisualizeRequest,
    ) -> Result<VisualizeResponse, String> {
        self.post_json(api::VISUALIZE_ENDPOINT, request).await
    }

    pub async fn analyze_conflicts(
        &self,
        request: &ConflictRequest,
    ) -> Result<ConflictResponse, String> {
        self.post_json(api::CONFLICTS_ENDPOINT, request).await
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        field: &str,
        file: web_sys::File,
    ) -> Result<T, String> {
        let form = FormData::new().map_err(js_error_message)?;
        form.append_with_blob_and_filename(field, &file, &file.name())
            .map_err(js_error_message)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&form);
        let request =
            Request::new_with_str_and_init(&self.url(endpoint), &init).map_err(js_error_message)?;
        self.send(request).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &impl Serialize,
    ) -> Result<T, String> {
        let body = serde_json::to_string(payload).map_err(|error| error.to_string())?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&body));
        let request =
            Request::new_with_str_and_init(&self.url(endpoint), &init).map_err(js_error_message)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error_message)?;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, String> {
        let window = web_sys::window().ok_or_else(|| "browser window unavailable".to_owned())?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error_message)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| "unexpected fetch result".to_owned())?;

        let status = response.status();
        let body = JsFuture::from(response.text().map_err(js_error_message)?)
            .await
            .map_err(js_error_message)?;
        let body = body.as_string().unwrap_or_default();

        // Error statuses still carry a JSON payload with the service's
        // message; the decoded success flag drives the outcome.
        serde_json::from_str(&body).map_err(|error| {
            if (200..300).contains(&status) {
                format!("Malformed response from the service: {error}")
            } else {
                format!("The service responded with status {status}")
            }
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }
}

fn js_error_message(value: JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .unwrap_or_else(|| format!("{value:?}"))
}
