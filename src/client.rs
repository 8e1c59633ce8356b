use std::time::Duration;

use oauth2::AccessToken;

use crate::endpoints::Environment;
use crate::error::Result;
use crate::oauth::{self, AccountCredentials, KeyPair};
use crate::operations::{FluxDeposit, SubmitFlux};
use crate::request::{self, ApiRequest, Credentials, Response};

/// Configuration for a [`Client`].
///
/// Timeouts are passed straight to the underlying `reqwest` client; when left
/// unset the transport defaults apply.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    environment: Environment,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    #[must_use]
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.environment = Environment::from_sandbox(sandbox);
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses an already configured HTTP client. Timeouts set on this builder
    /// are ignored in that case.
    #[must_use]
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> Result<Client> {
        let http = match self.http_client {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(Client {
            environment: self.environment,
            bearer: None,
            account: None,
            http,
        })
    }
}

/// This is the client that is used for interacting with the Chorus Pro API. It
/// holds the OAuth bearer, the Chorus Pro account credentials and the target
/// environment.
///
/// Setters take `&mut self`; a client shared between tasks must be wrapped in
/// a lock by the caller.
#[derive(Clone, Debug)]
pub struct Client {
    environment: Environment,
    bearer: Option<AccessToken>,
    account: Option<AccountCredentials>,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client for the sandbox or the production environment.
    pub fn new(sandbox: bool) -> Result<Self> {
        Self::builder().sandbox(sandbox).build()
    }

    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Obtains a bearer through the client-credentials grant.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] without contacting the server
    /// when the client id is empty, and [`crate::Error::Auth`] when the token
    /// endpoint answers with anything but `200 OK`. A `200 OK` without an
    /// `access_token` leaves the client with no bearer.
    #[instrument(skip(self, key_pair), fields(environment = %self.environment))]
    pub async fn connect_with_oauth(&mut self, key_pair: &KeyPair) -> Result<()> {
        let token =
            oauth::exchange_client_credentials(&self.http, self.environment.token_url(), key_pair)
                .await?;
        if token.access_token.is_some() {
            debug!(expires_in = ?token.expires_in, "obtained access token");
        } else {
            warn!("token response carries no access_token, clearing bearer");
        }
        self.bearer = token.access_token;
        Ok(())
    }

    /// Uses an existing bearer. Nothing is validated.
    pub fn connect_with_bearer(&mut self, bearer: impl Into<String>) {
        trace!("updating bearer");
        self.bearer = Some(AccessToken::new(bearer.into()));
    }

    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_ref().map(|token| token.secret().as_str())
    }

    /// Sets the Chorus Pro account on whose behalf requests are made.
    pub fn set_account_credentials(&mut self, user: &str, password: &str) {
        self.account = Some(AccountCredentials::new(user, password));
    }

    pub fn set_account(&mut self, account: AccountCredentials) {
        self.account = Some(account);
    }

    #[must_use]
    pub fn account_credentials(&self) -> Option<&AccountCredentials> {
        self.account.as_ref()
    }

    pub fn set_sandbox_mode(&mut self, sandbox: bool) {
        trace!(sandbox, "updating sandbox mode");
        self.environment = Environment::from_sandbox(sandbox);
    }

    #[must_use]
    pub fn is_sandbox(&self) -> bool {
        self.environment.is_sandbox()
    }

    pub fn set_environment(&mut self, environment: Environment) {
        trace!(%environment, "updating environment");
        self.environment = environment;
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Executes a request with the current bearer and account credentials.
    #[instrument(skip(self, request), fields(environment = %self.environment))]
    pub async fn execute<R: ApiRequest + ?Sized>(&self, request: &R) -> Result<Response> {
        let credentials = Credentials {
            bearer: self.bearer(),
            account: self.account.as_ref(),
        };
        request::execute(&self.http, request, credentials, &self.environment).await
    }

    /// Access the flux submission API
    #[must_use]
    pub fn flux(&self) -> FluxApi<'_> {
        FluxApi { client: self }
    }
}

/// API handler for flux endpoints
#[derive(Debug)]
pub struct FluxApi<'a> {
    client: &'a Client,
}

impl FluxApi<'_> {
    /// Submit a flux file and decode the deposit receipt
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: &SubmitFlux) -> Result<FluxDeposit> {
        let response = self.client.execute(request).await?;
        let deposit = FluxDeposit::try_from(response)?;
        info!(numero_flux_depot = %deposit.numero_flux_depot, "flux deposited");
        Ok(deposit)
    }
}
