//! Short-lived JWT credentials for the Zoom API.
//!
//! Every outgoing request carries a freshly minted HS256 token whose issuer is
//! the API key and whose expiry lies [`TOKEN_TTL_MS`] after the mint time.
//! Tokens are never cached.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClientError;

/// Lifetime of a minted token in milliseconds.
pub const TOKEN_TTL_MS: u64 = 5000;

/// API key and secret used to sign request tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"*********")
            .finish()
    }
}

/// Claims carried by a request token.
///
/// `exp` is expressed in epoch milliseconds, matching what the Zoom JWT app
/// integration has always been sent by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub exp: u64,
}

/// A signed, compact-serialized JWT.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken {
    token: String,
    claims: Claims,
}

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

/// Mints a token for `credentials` as of `now_ms` (epoch milliseconds).
pub fn mint_token(credentials: &Credentials, now_ms: u64) -> Result<SignedToken, ClientError> {
    if credentials.key().is_empty() {
        return Err(ClientError::Signing("API key is empty".to_string()));
    }
    if credentials.secret().is_empty() {
        return Err(ClientError::Signing("API secret is empty".to_string()));
    }

    let claims = Claims {
        iss: credentials.key().to_string(),
        exp: now_ms.saturating_add(TOKEN_TTL_MS),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(credentials.secret().as_bytes()),
    )
    .map_err(|e| ClientError::Signing(e.to_string()))?;

    Ok(SignedToken { token, claims })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};

    fn decode(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    #[test]
    fn test_mint_token_claims() {
        let creds = Credentials::new("my-key", "my-secret");
        let token = mint_token(&creds, 1_700_000_000_000).unwrap();

        assert_eq!(token.claims().iss, "my-key");
        assert_eq!(token.claims().exp, 1_700_000_005_000);
    }

    #[test]
    fn test_mint_token_verifies_against_secret() {
        let creds = Credentials::new("my-key", "my-secret");
        let token = mint_token(&creds, 1_700_000_000_000).unwrap();

        let claims = decode(token.as_str(), "my-secret").unwrap();
        assert_eq!(claims.iss, "my-key");
        assert_eq!(claims.exp, 1_700_000_005_000);

        assert!(decode(token.as_str(), "other-secret").is_err());
    }

    #[test]
    fn test_mint_token_differs_across_mint_times() {
        let creds = Credentials::new("my-key", "my-secret");
        let first = mint_token(&creds, 1_700_000_000_000).unwrap();
        let second = mint_token(&creds, 1_700_000_000_001).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert_eq!(second.claims().exp - first.claims().exp, 1);
    }

    #[test]
    fn test_mint_token_empty_secret() {
        let creds = Credentials::new("my-key", "");
        let err = mint_token(&creds, 0).unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
    }

    #[test]
    fn test_mint_token_empty_key() {
        let creds = Credentials::new("", "my-secret");
        let err = mint_token(&creds, 0).unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
    }

    #[test]
    fn test_bearer_format() {
        let creds = Credentials::new("my-key", "my-secret");
        let token = mint_token(&creds, 0).unwrap();
        assert_eq!(token.bearer(), format!("Bearer {}", token));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials::new("my-key", "top-secret-value");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("my-key"));
        assert!(!rendered.contains("top-secret-value"));
    }
}
