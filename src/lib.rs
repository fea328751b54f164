//! Signed-request client for the Zoom v2 REST API.
//!
//! ```no_run
//! use zoom_client::{Credentials, LogMetrics, RequestOptions, ZoomClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ZoomClient::new(Credentials::new("key", "secret"), LogMetrics)?;
//! if let Some(envelope) = client.get("users/me", RequestOptions::new()).await? {
//!     println!("{} {:?}", envelope.http_code, envelope.get("email"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod runtime;

pub use auth::{Credentials, SignedToken};
pub use config::ZoomConfig;
pub use error::ClientError;
pub use http::{HttpMethod, RequestOptions, RequestSpec, ResponseEnvelope, ZoomClient};
pub use metrics::{InMemoryMetrics, LogMetrics, MetricEvent, MetricsSink, NoopMetrics};
