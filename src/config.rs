use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;

use crate::{auth::Credentials, error::ClientError, http::DEFAULT_API_URL, runtime::Runtime};

pub const API_KEY_ENV: &str = "ZOOM_API_KEY";
pub const API_SECRET_ENV: &str = "ZOOM_API_SECRET";
pub const API_URL_ENV: &str = "ZOOM_API_URL";

/// Settings a [`crate::http::ZoomClient`] is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomConfig {
    pub credentials: Credentials,
    pub api_url: String,
    pub user_agent: String,
}

impl ZoomConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
        }
    }

    /// Reads `ZOOM_API_KEY`, `ZOOM_API_SECRET` and the optional `ZOOM_API_URL`.
    pub fn from_runtime<R: Runtime>(runtime: &R) -> Result<Self> {
        Self::resolve(runtime, None, None, None)
    }

    /// Like [`ZoomConfig::from_runtime`], but explicit values win over the
    /// environment.
    pub fn resolve<R: Runtime>(
        runtime: &R,
        api_key: Option<String>,
        api_secret: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let key = match api_key.filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => required_env(runtime, API_KEY_ENV)?,
        };
        let secret = match api_secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => required_env(runtime, API_SECRET_ENV)?,
        };

        let mut config = Self::new(Credentials::new(key, secret));

        let api_url = api_url.or_else(|| runtime.env_var(API_URL_ENV).ok());
        if let Some(api_url) = api_url.filter(|u| !u.is_empty()) {
            debug!("Using Zoom API URL {}", api_url);
            config.api_url = api_url;
        }
        Ok(config)
    }

    /// Builds the reqwest client used as transport.
    pub fn build_http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn required_env<R: Runtime>(runtime: &R, key: &str) -> Result<String> {
    match runtime.env_var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ClientError::MissingConfig(key.to_string()).into()),
    }
}

fn default_user_agent() -> String {
    format!("zoom-client/{}", env!("ZOOM_CLIENT_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn runtime_with(vars: &'static [(&'static str, &'static str)]) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_env_var().returning(move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .ok_or(std::env::VarError::NotPresent)
        });
        runtime
    }

    #[test]
    fn test_from_runtime_defaults() {
        let runtime = runtime_with(&[(API_KEY_ENV, "key"), (API_SECRET_ENV, "secret")]);
        let config = ZoomConfig::from_runtime(&runtime).unwrap();

        assert_eq!(config.credentials, Credentials::new("key", "secret"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.user_agent.starts_with("zoom-client/"));
    }

    #[test]
    fn test_from_runtime_api_url_override() {
        let runtime = runtime_with(&[
            (API_KEY_ENV, "key"),
            (API_SECRET_ENV, "secret"),
            (API_URL_ENV, "http://localhost:9999/v2"),
        ]);
        let config = ZoomConfig::from_runtime(&runtime).unwrap();
        assert_eq!(config.api_url, "http://localhost:9999/v2");
    }

    #[test]
    fn test_from_runtime_missing_secret() {
        let runtime = runtime_with(&[(API_KEY_ENV, "key")]);
        let err = ZoomConfig::from_runtime(&runtime).unwrap_err();

        match err.downcast_ref::<ClientError>() {
            Some(ClientError::MissingConfig(key)) => assert_eq!(key, API_SECRET_ENV),
            other => panic!("Expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_from_runtime_empty_key_is_missing() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(API_KEY_ENV))
            .returning(|_| Ok(String::new()));

        let err = ZoomConfig::from_runtime(&runtime).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_resolve_explicit_values_win() {
        let runtime = runtime_with(&[
            (API_KEY_ENV, "env-key"),
            (API_SECRET_ENV, "env-secret"),
            (API_URL_ENV, "http://env/v2"),
        ]);
        let config = ZoomConfig::resolve(
            &runtime,
            Some("cli-key".to_string()),
            None,
            Some("http://cli/v2".to_string()),
        )
        .unwrap();

        assert_eq!(config.credentials, Credentials::new("cli-key", "env-secret"));
        assert_eq!(config.api_url, "http://cli/v2");
    }

    #[test]
    fn test_resolve_without_environment() {
        let runtime = runtime_with(&[]);
        let config = ZoomConfig::resolve(
            &runtime,
            Some("key".to_string()),
            Some("secret".to_string()),
            None,
        )
        .unwrap();

        assert_eq!(config.credentials.key(), "key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_build_http_client_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let config = ZoomConfig::new(Credentials::new("key", "secret"));

        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", config.user_agent.as_str())
            .create_async()
            .await;

        let client = config.build_http_client().unwrap();
        let _ = client.get(server.url()).send().await;

        mock.assert_async().await;
    }
}
