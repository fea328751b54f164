//! Request description: verb, path, caller headers and body.

use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// HTTP verbs the Zoom API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Whether the verb declares a JSON content type unless told otherwise.
    pub fn forces_json(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => anyhow::bail!(
                "Unsupported HTTP method '{}'. Expected one of GET, POST, PUT, PATCH, DELETE.",
                s
            ),
        }
    }
}

/// Returns the first segment of a request path, used to name metrics.
///
/// A leading `/` is ignored, so `"/users/me"` and `"users/me"` both yield
/// `"users"`. A path without `/` is its own prefix.
pub fn path_prefix(path: &str) -> &str {
    let path = normalize_path(path);
    path.split('/').next().unwrap_or(path)
}

/// Drops a single leading `/` so the path can be appended to the base URL.
pub(crate) fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Optional headers and body for a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header. Names are case-insensitive; a later header with the
    /// same name replaces an earlier one.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` into the JSON request payload.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        Ok(self.body(value))
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Everything needed to perform one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub path: String,
    pub method: HttpMethod,
    pub options: RequestOptions,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Rejects paths that cannot address an endpoint.
    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if normalize_path(&self.path).is_empty() {
            return Err(ClientError::InvalidPath(format!(
                "'{}' does not name an endpoint",
                self.path
            )));
        }
        Ok(())
    }

    /// Builds the outgoing header map.
    ///
    /// Authorization comes first, caller headers override it, and body-bearing
    /// verbs get `content-type: application/json` only when the caller did not
    /// set a content type.
    pub(crate) fn build_headers(&self, bearer: &str) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(bearer)
            .map_err(|e| ClientError::Signing(format!("token is not a valid header: {}", e)))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        for (name, value) in &self.options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("'{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("value of '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        if self.method.forces_json() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(headers)
    }
}
