//! Signed HTTP access to the Zoom v2 API.

mod client;
mod request;
mod response;

pub use client::{DEFAULT_API_URL, ZoomClient};
pub use request::{HttpMethod, RequestOptions, RequestSpec, path_prefix};
pub use response::{HTTP_CODE_KEY, ResponseEnvelope, ResponseKind};
