use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use oauth2::{AccessToken, ClientId, ClientSecret};
use reqwest::{StatusCode, header};
use serde::Deserialize;

use crate::error::{Error, Result};

/// The only scope requested by Chorus Pro client-credentials grants.
pub const OPENID_SCOPE: &str = "openid";

const CLIENT_ID_VAR: &str = "OAUTH_ID";
const CLIENT_SECRET_VAR: &str = "OAUTH_SECRET";
const LOGIN_VAR: &str = "CHORUS_LOGIN";
const PASSWORD_VAR: &str = "CHORUS_PASSWORD";

/// Stores the OAuth 2 client ID and client secret.
#[derive(Debug, Clone)]
pub struct KeyPair(pub(crate) ClientId, pub(crate) Option<ClientSecret>);

impl KeyPair {
    /// Creates a new `KeyPair`. An empty secret is treated as absent, which is
    /// how public clients authenticate.
    #[must_use]
    pub fn new(client_id: String, client_secret: Option<String>) -> Self {
        Self(
            ClientId::new(client_id),
            client_secret
                .filter(|secret| !secret.is_empty())
                .map(ClientSecret::new),
        )
    }

    /// Creates a new `KeyPair` from the `OAUTH_ID` and `OAUTH_SECRET` environment variables.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var(CLIENT_ID_VAR)
            .map_err(|_| Error::Environment(CLIENT_ID_VAR.to_string()))?;
        Ok(Self::new(client_id, std::env::var(CLIENT_SECRET_VAR).ok()))
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.0.as_str()
    }

    /// Form fields of the client-credentials grant, in wire order.
    pub(crate) fn token_form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.0.as_str()),
        ];
        if let Some(secret) = &self.1 {
            form.push(("client_secret", secret.secret().as_str()));
        }
        form.push(("scope", OPENID_SCOPE));
        form
    }
}

/// The Chorus Pro account on whose behalf requests are made, already encoded
/// for the `cpro-account` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials(String);

impl AccountCredentials {
    /// Encodes `user:password` as base64.
    #[must_use]
    pub fn new(user: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{user}:{password}")))
    }

    /// Reads `CHORUS_LOGIN` and `CHORUS_PASSWORD` from the environment.
    pub fn from_env() -> Result<Self> {
        let user = std::env::var(LOGIN_VAR).map_err(|_| Error::Environment(LOGIN_VAR.to_string()))?;
        let password =
            std::env::var(PASSWORD_VAR).map_err(|_| Error::Environment(PASSWORD_VAR.to_string()))?;
        Ok(Self::new(&user, &password))
    }

    /// The base64 header value.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountCredentials([redacted])")
    }
}

/// Decoded body of a successful token request. Keys the server leaves out
/// decode as `None`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<AccessToken>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

/// Performs the client-credentials grant against `token_url`.
#[instrument(skip(http, key_pair), fields(client_id = key_pair.client_id()))]
pub(crate) async fn exchange_client_credentials(
    http: &reqwest::Client,
    token_url: &str,
    key_pair: &KeyPair,
) -> Result<TokenResponse> {
    if key_pair.client_id().is_empty() {
        return Err(Error::InvalidArgument(
            "you must provide a client id in order to connect".to_string(),
        ));
    }

    trace!(%token_url, "requesting access token");
    let response = http
        .post(token_url)
        .header(header::ACCEPT, "application/json")
        .form(&key_pair.token_form())
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    debug!("Token response: status={}, body size={} bytes", status, text.len());

    if status != StatusCode::OK {
        error!("Token request rejected with status {}", status);
        return Err(Error::auth(status, text));
    }

    serde_json::from_str(&text).map_err(|e| Error::DeserializationError(e, Some(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_form_includes_secret_when_present() {
        let pair = KeyPair::new("id".to_string(), Some("secret".to_string()));
        assert_eq!(
            pair.token_form(),
            vec![
                ("grant_type", "client_credentials"),
                ("client_id", "id"),
                ("client_secret", "secret"),
                ("scope", "openid"),
            ]
        );
    }

    #[test]
    fn empty_secret_is_omitted() {
        let pair = KeyPair::new("id".to_string(), Some(String::new()));
        assert_eq!(
            pair.token_form(),
            vec![
                ("grant_type", "client_credentials"),
                ("client_id", "id"),
                ("scope", "openid"),
            ]
        );
    }

    #[test]
    fn account_credentials_are_base64_of_user_and_password() {
        let account = AccountCredentials::new("user", "password");
        assert_eq!(account.encoded(), "dXNlcjpwYXNzd29yZA==");
        assert!(!format!("{account:?}").contains("dXNlcjpwYXNzd29yZA=="));
    }

    #[tokio::test]
    async fn empty_client_id_fails_before_any_request() {
        // Nothing listens on this port; reaching the network would fail with a
        // request error instead.
        let http = reqwest::Client::new();
        let pair = KeyPair::new(String::new(), Some("secret".to_string()));
        let result = exchange_client_credentials(&http, "http://127.0.0.1:9/token", &pair).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn token_response_without_access_token_decodes() {
        let token: TokenResponse = serde_json::from_str(r#"{"token_type":"Bearer"}"#).unwrap();
        assert!(token.access_token.is_none());
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
    }
}
