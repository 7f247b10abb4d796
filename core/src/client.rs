//! Request builder, response parser and blocking client for nationalize.io.
//!
//! # Design
//! `NationalizeClient` holds an immutable `ClientConfig` and a shared
//! `Transport`, and carries no mutable state between calls, so one instance
//! can serve many threads at once. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. `predict` / `batch_predict` glue the two together
//! through the configured transport; hosts doing their own I/O call the pair
//! directly.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{ApiResponse, ErrorBody, Prediction, RateLimit};

const NAME_PARAM: &str = "name";
const BATCH_NAME_PARAM: &str = "name[]";
const API_KEY_PARAM: &str = "apikey";

/// Blocking client for the nationalize.io API.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct NationalizeClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl NationalizeClient {
    /// Client for the public endpoint, without an API key.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Predict the nationality of a single name.
    pub fn predict(&self, name: &str) -> Result<ApiResponse<Prediction>, ApiError> {
        let request = self.build_predict(name)?;
        let response = self.execute(&request)?;
        self.parse_predict(response)
    }

    /// Predict the nationality of several names in one request.
    ///
    /// The result is in the order the service returned it.
    pub fn batch_predict<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<ApiResponse<Vec<Prediction>>, ApiError> {
        let request = self.build_batch_predict(names)?;
        let response = self.execute(&request)?;
        self.parse_batch_predict(response)
    }

    pub fn build_predict(&self, name: &str) -> Result<HttpRequest, ApiError> {
        self.build_get(&[(NAME_PARAM, name)])
    }

    pub fn build_batch_predict<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<HttpRequest, ApiError> {
        let params: Vec<(&str, &str)> = names
            .iter()
            .map(|name| (BATCH_NAME_PARAM, name.as_ref()))
            .collect();
        self.build_get(&params)
    }

    pub fn parse_predict(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<Prediction>, ApiError> {
        classify(response)
    }

    pub fn parse_batch_predict(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<Vec<Prediction>>, ApiError> {
        classify(response)
    }

    fn build_get(&self, params: &[(&str, &str)]) -> Result<HttpRequest, ApiError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            TransportError::new(format!("invalid base url {:?}: {e}", self.config.base_url))
        })?;

        let api_key = self
            .config
            .has_api_key()
            .then_some((API_KEY_PARAM, self.config.api_key.as_str()));
        let pairs: Vec<(&str, &str)> = params.iter().copied().chain(api_key).collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = request.method.as_str(),
            url = %redact_api_key(&request.url),
            "sending prediction request"
        );
        self.transport.execute(request).map_err(|e| {
            let Some(headers) = e.response_headers.as_deref() else {
                warn!(error = %e, "prediction request failed before a response");
                return ApiError::Transport(e);
            };
            // Headers arrived, so the caller still gets the rate limit.
            warn!(error = %e, "response body could not be read");
            ApiError::Decode {
                message: e.message.clone(),
                rate_limit: RateLimit::from_headers(headers),
            }
        })
    }
}

impl Default for NationalizeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NationalizeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NationalizeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map a response to data or error by status: exactly 200 is success.
fn classify<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    let rate_limit = RateLimit::from_response(&response);
    debug!(
        status = response.status,
        remaining = %rate_limit.remaining,
        "received prediction response"
    );

    if response.status != 200 {
        let body: ErrorBody = decode(&response.body, &rate_limit)?;
        warn!(status = response.status, message = %body.error, "service rejected request");
        return Err(ApiError::Service {
            status: response.status,
            message: body.error,
            rate_limit,
        });
    }

    let data = decode(&response.body, &rate_limit)?;
    Ok(ApiResponse { data, rate_limit })
}

fn decode<T: DeserializeOwned>(body: &[u8], rate_limit: &RateLimit) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "response body did not match expected shape");
        ApiError::Decode {
            message: e.to_string(),
            rate_limit: rate_limit.clone(),
        }
    })
}

/// `url` with the `apikey` value masked, for logging.
fn redact_api_key(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !parsed.query_pairs().any(|(key, _)| key == API_KEY_PARAM) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == API_KEY_PARAM {
                "<redacted>".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

/// Options for `NationalizeClient`, applied in call order over the defaults.
/// Setting the same option twice keeps the last value.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Replace both base URL and API key.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// An empty key disables the `apikey` parameter.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a transport the caller also keeps a handle to.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> NationalizeClient {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));
        NationalizeClient {
            config: self.config,
            transport,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
