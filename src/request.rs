//! The request/response contract shared by every Chorus Pro operation.
//!
//! Each operation knows its relative path and how to turn its own fields into
//! a JSON body. Sending it, attaching the authentication headers and decoding
//! the answer is done once, in [`execute`].

use reqwest::{StatusCode, header};
use serde_json::{Map, Value};

use crate::endpoints::Environment;
use crate::error::{Error, Result};
use crate::oauth::AccountCredentials;

/// Header carrying the base64 `user:password` of the Chorus Pro account.
pub const HEADER_ACCOUNT: &str = "cpro-account";
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Decoded JSON object returned by a successful call.
pub type Response = Map<String, Value>;

mod private {
    pub trait Sealed {}
}

pub(crate) use private::Sealed;

/// A Chorus Pro API operation.
///
/// The set of operations is closed: this trait is implemented by the types in
/// [`crate::operations`] and cannot be implemented outside the crate.
pub trait ApiRequest: Sealed {
    /// Relative path of the operation, e.g. `/deposer/flux`.
    fn path(&self) -> &'static str;

    /// Builds the JSON body.
    ///
    /// Required fields are checked in declaration order; the first one that is
    /// unset aborts with [`Error::MissingField`].
    fn post_fields(&self) -> Result<Map<String, Value>>;
}

/// Credentials attached to every invoice API call.
#[derive(Clone, Copy, Default)]
pub struct Credentials<'a> {
    pub bearer: Option<&'a str>,
    pub account: Option<&'a AccountCredentials>,
}

impl Credentials<'_> {
    fn headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        match self.account {
            Some(account) => {
                headers.insert(HEADER_ACCOUNT, header::HeaderValue::from_str(account.encoded())?);
            }
            None => warn!(
                "no Chorus Pro account credentials set, omitting {} header",
                HEADER_ACCOUNT
            ),
        }

        match self.bearer {
            Some(bearer) => {
                let mut value = header::HeaderValue::from_str(&format!("Bearer {bearer}"))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
            None => warn!("no bearer token set, omitting Authorization header"),
        }

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        Ok(headers)
    }
}

/// POSTs `request` to the invoice API and interprets the answer.
///
/// Nothing is sent when the body cannot be built.
#[instrument(skip(http, request, credentials), fields(path = request.path()))]
pub async fn execute<R: ApiRequest + ?Sized>(
    http: &reqwest::Client,
    request: &R,
    credentials: Credentials<'_>,
    environment: &Environment,
) -> Result<Response> {
    let url = environment.url_for(request.path());
    let headers = credentials.headers()?;
    let body = serde_json::to_vec(&request.post_fields()?)?;

    trace!(%url, body_size = body.len(), "making POST request");
    let response = http.post(&url).headers(headers).body(body).send().await?;

    let status = response.status();
    let text = response.text().await?;
    debug!("Response from {}: status={}, body size={} bytes", url, status, text.len());
    trace!("Response text:\n{}", text);

    if status == StatusCode::OK {
        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to deserialize response: {}", e);
            Error::DeserializationError(e, Some(text))
        })
    } else {
        error!("Unexpected status code: {}", status);
        Err(Error::api(status, text))
    }
}
