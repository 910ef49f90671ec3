//! Declarative endpoint descriptors and the shared service helper.
//!
//! # Design
//! Each backend operation is described by a const `Endpoint` record: method,
//! path template relative to the service's base path, and what the response
//! carries. `Service` interprets any descriptor the same way, so the
//! per-resource modules stay pure mappings from typed arguments to requests.
//! Base URL joining, default headers and query attachment live only here.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::SearchParams;

/// What a successful response body contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Empty,
}

/// A single backend operation described as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Operation name, recorded on the client's per-call span.
    pub name: &'static str,
    pub method: HttpMethod,
    /// Relative to the service base path. `{name}` marks a path argument.
    pub path: &'static str,
    pub response: ResponseKind,
}

impl Endpoint {
    /// Substitute every `{name}` in the template from `args`.
    pub fn render_path(&self, args: &[(&str, String)]) -> Result<String, ApiError> {
        let mut rendered = String::with_capacity(self.path.len());
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = args
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
                .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;
            rendered.push_str(&rest[..start]);
            rendered.push_str(value);
            rest = &rest[start + len + 1..];
        }
        rendered.push_str(rest);
        Ok(rendered)
    }
}

/// A resource's base path bound to a backend base URL.
///
/// Stateless apart from its configuration; cheap to clone and share.
#[derive(Debug, Clone)]
pub struct Service {
    root: String,
    default_headers: Vec<(String, String)>,
}

impl Service {
    pub fn new(base_url: &str, base_path: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let base_path = base_path.trim_matches('/');
        Self {
            root: format!("{base_url}/{base_path}"),
            default_headers: Vec::new(),
        }
    }

    /// Attach a bearer token to every request built by this service.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.default_headers
            .push(("authorization".to_string(), format!("Bearer {token}")));
        self
    }

    /// Absolute URL of the service root, without a trailing slash.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Build the request for `endpoint`.
    ///
    /// `body`, when given, is serialized to JSON and sent with a matching
    /// content type.
    pub fn request<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        path_args: &[(&str, String)],
        query: SearchParams,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let suffix = endpoint.render_path(path_args)?;
        let url = if suffix.is_empty() {
            self.root.clone()
        } else {
            format!("{}/{suffix}", self.root)
        };

        let mut headers = self.default_headers.clone();
        if endpoint.response == ResponseKind::Json {
            headers.push(("accept".to_string(), "application/json".to_string()));
        }
        let body = match body {
            Some(body) => {
                let json = serde_json::to_string(body)
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(json)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: endpoint.method,
            url,
            query: query.into_pairs(),
            headers,
            body,
        })
    }

    /// Build a request with no body.
    pub fn request_without_body(
        &self,
        endpoint: &Endpoint,
        path_args: &[(&str, String)],
        query: SearchParams,
    ) -> Result<HttpRequest, ApiError> {
        self.request::<()>(endpoint, path_args, query, None)
    }

    /// Check the status and decode the JSON body.
    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Check the status and discard whatever body came back.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
