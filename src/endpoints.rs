use std::fmt;

use url::Url;

use crate::error::{Error, Result};

pub const API_URL: &str = "https://api.aife.economie.gouv.fr/cpro/factures/v1";
pub const API_SANDBOX_URL: &str = "https://sandbox-api.aife.economie.gouv.fr/cpro/factures/v1";
pub const OAUTH_URL: &str = "https://oauth.aife.economie.gouv.fr/api/oauth/token";
pub const OAUTH_SANDBOX_URL: &str = "https://sandbox-oauth.aife.economie.gouv.fr/api/oauth/token";

/// The Chorus Pro deployment a [`crate::Client`] talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
    /// Alternate endpoints, e.g. a local mock server.
    Custom { api_base: Url, token_url: Url },
}

impl Environment {
    #[must_use]
    pub fn from_sandbox(sandbox: bool) -> Self {
        if sandbox { Self::Sandbox } else { Self::Production }
    }

    /// Builds a custom environment from two URL strings.
    pub fn custom(api_base: &str, token_url: &str) -> Result<Self> {
        Ok(Self::Custom {
            api_base: Url::parse(api_base).map_err(|e| {
                Error::InvalidArgument(format!("invalid API base URL {api_base}: {e}"))
            })?,
            token_url: Url::parse(token_url).map_err(|e| {
                Error::InvalidArgument(format!("invalid token URL {token_url}: {e}"))
            })?,
        })
    }

    #[must_use]
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }

    /// Root of the invoice API, without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        match self {
            Self::Production => API_URL,
            Self::Sandbox => API_SANDBOX_URL,
            Self::Custom { api_base, .. } => api_base.as_str().trim_end_matches('/'),
        }
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        match self {
            Self::Production => OAUTH_URL,
            Self::Sandbox => OAUTH_SANDBOX_URL,
            Self::Custom { token_url, .. } => token_url.as_str(),
        }
    }

    /// Full URL of an operation path such as `/deposer/flux`.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.api_base(), path)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
            Self::Custom { api_base, .. } => write!(f, "custom ({api_base})"),
        }
    }
}
