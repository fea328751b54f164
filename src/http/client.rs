//! Zoom API client: one signed attempt per call, telemetry on every outcome.

use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Instant;

use super::request::{HttpMethod, RequestOptions, RequestSpec, normalize_path, path_prefix};
use super::response::{ResponseEnvelope, ResponseKind};
use crate::auth::{Credentials, SignedToken, mint_token};
use crate::config::ZoomConfig;
use crate::metrics::{
    MetricsSink, REQUEST_EXCEPTION_METRIC, code_metric_name, latency_metric_name,
};
use crate::runtime::{RealRuntime, Runtime};

/// Base URL every request path is appended to.
pub const DEFAULT_API_URL: &str = "https://api.zoom.us/v2";

/// Client for the Zoom v2 REST API.
///
/// Each call mints a fresh token, performs exactly one HTTP request and
/// reports latency and status counters to the configured [`MetricsSink`].
/// Non-2xx statuses are returned as envelopes, not errors. Transport failures
/// are counted under [`REQUEST_EXCEPTION_METRIC`] and resolve to `Ok(None)`.
pub struct ZoomClient<R: Runtime = RealRuntime> {
    http: Client,
    api_url: String,
    credentials: Credentials,
    runtime: Arc<R>,
    metrics: Arc<dyn MetricsSink>,
}

impl<R: Runtime> Clone for ZoomClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            api_url: self.api_url.clone(),
            credentials: self.credentials.clone(),
            runtime: Arc::clone(&self.runtime),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl ZoomClient<RealRuntime> {
    /// Creates a client against [`DEFAULT_API_URL`] with the system clock.
    pub fn new(credentials: Credentials, metrics: impl MetricsSink + 'static) -> Result<Self> {
        Self::from_config(ZoomConfig::new(credentials), RealRuntime, metrics)
    }
}

impl<R: Runtime> ZoomClient<R> {
    pub fn from_config(
        config: ZoomConfig,
        runtime: R,
        metrics: impl MetricsSink + 'static,
    ) -> Result<Self> {
        let http = config.build_http_client()?;
        Ok(Self::from_parts(
            http,
            config.api_url,
            config.credentials,
            runtime,
            metrics,
        ))
    }

    pub fn from_parts(
        http: Client,
        api_url: impl Into<String>,
        credentials: Credentials,
        runtime: R,
        metrics: impl MetricsSink + 'static,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            api_url,
            credentials,
            runtime: Arc::new(runtime),
            metrics: Arc::new(metrics),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Mints a bearer token valid for the next few seconds.
    pub fn token(&self) -> Result<SignedToken> {
        Ok(mint_token(&self.credentials, self.runtime.now_millis())?)
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ResponseEnvelope>> {
        self.request(RequestSpec::new(HttpMethod::Get, path).with_options(options))
            .await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn post(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ResponseEnvelope>> {
        self.request(RequestSpec::new(HttpMethod::Post, path).with_options(options))
            .await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn put(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ResponseEnvelope>> {
        self.request(RequestSpec::new(HttpMethod::Put, path).with_options(options))
            .await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn patch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ResponseEnvelope>> {
        self.request(RequestSpec::new(HttpMethod::Patch, path).with_options(options))
            .await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn delete(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ResponseEnvelope>> {
        self.request(RequestSpec::new(HttpMethod::Delete, path).with_options(options))
            .await
    }

    /// Performs one signed request.
    ///
    /// Returns `Err` only when the request cannot be built (empty path,
    /// invalid header, signing failure); nothing is sent in that case.
    #[tracing::instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn request(&self, spec: RequestSpec) -> Result<Option<ResponseEnvelope>> {
        spec.validate()?;

        let path = normalize_path(&spec.path);
        let prefix = path_prefix(path);

        let token = self.token()?;
        let headers = spec.build_headers(&token.bearer())?;

        let url = format!("{}/{}", self.api_url, path);
        debug!("{} {}...", spec.method, url);

        let mut builder = self
            .http
            .request(spec.method.as_reqwest(), &url)
            .headers(headers);
        if let Some(body) = spec.options.body_value() {
            let bytes = serde_json::to_vec(body).context("Failed to serialize request body")?;
            builder = builder.body(bytes);
        }

        match self.dispatch(builder, prefix).await {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                self.metrics.increment(REQUEST_EXCEPTION_METRIC, 1);
                error!("Zoom request {} {} failed: {:#}", spec.method, url, e);
                Ok(None)
            }
        }
    }

    /// Sends the request, records status metrics and decodes the body.
    async fn dispatch(&self, builder: RequestBuilder, prefix: &str) -> Result<ResponseEnvelope> {
        let started = Instant::now();

        let response = builder
            .send()
            .await
            .context("Failed to send request to Zoom API")?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let status = response.status();
        let code = status.as_u16();

        self.metrics.timing(&latency_metric_name(prefix, code), elapsed_ms);
        self.metrics.increment(&code_metric_name(prefix, code), 1);

        debug!("Zoom responded {} in {}ms", status, elapsed_ms);

        match ResponseKind::classify(status) {
            ResponseKind::Json => {
                let body = response
                    .bytes()
                    .await
                    .context("Failed to read response body from Zoom API")?;
                ResponseEnvelope::from_json_body(code, &body)
            }
            ResponseKind::NoContent => Ok(ResponseEnvelope::status_only(code)),
            ResponseKind::StatusOnly => {
                debug!("Zoom returned non-success status {}", status);
                Ok(ResponseEnvelope::status_only(code))
            }
        }
    }
}
