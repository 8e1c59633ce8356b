//! Sentry integration for chorus-pro-rs errors.
//!
//! This module is only available when the `sentry` feature is enabled.
//!
//! ```toml
//! [dependencies]
//! chorus-pro-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Errors returned by the token endpoint or the invoice API carry a span trace
//! when they occur within an instrumented span and a `tracing_error::ErrorLayer`
//! is installed.

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

const MAX_BODY_PREVIEW: usize = 500;

/// Convert a chorus-pro-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, message, data) = match error {
            Error::Auth {
                status,
                error: code,
                description,
                ..
            }
            | Error::Api {
                status,
                error: code,
                description,
                ..
            } => {
                let category = if matches!(error, Error::Auth { .. }) {
                    "auth"
                } else {
                    "chorus.api"
                };
                let mut data = BTreeMap::new();
                data.insert("status_code".to_string(), Value::from(status.as_u16()));
                data.insert("error".to_string(), Value::from(code.clone()));
                data.insert("error_description".to_string(), Value::from(description.clone()));
                (category, format!("{code}: {description}"), data)
            }

            Error::MissingField { field } => {
                let mut data = BTreeMap::new();
                data.insert("field".to_string(), Value::from(*field));
                ("chorus.validation", error.to_string(), data)
            }

            Error::InvalidArgument(_) | Error::NotFound { .. } => {
                ("chorus.validation", error.to_string(), BTreeMap::new())
            }

            Error::Request(source) => (
                "http.request",
                format!("HTTP request error: {source}"),
                BTreeMap::new(),
            ),

            Error::DeserializationError(source, _) => (
                "http.response",
                format!("Failed to deserialize response: {source}"),
                BTreeMap::new(),
            ),

            Error::Io(_) | Error::InvalidHeader(_) | Error::Environment(_) => {
                ("chorus.config", error.to_string(), BTreeMap::new())
            }
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(message),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Convert a chorus-pro-rs Error into Sentry context data.
///
/// ```ignore
/// use sentry::configure_scope;
/// use chorus_pro_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.execute(&request).await {
///     configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "chorus.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(status) = error.code() {
        context.insert("chorus.status_code".to_string(), Value::from(status));
    }

    if let Some(body) = error.response_body() {
        let mut preview: String = body.chars().take(MAX_BODY_PREVIEW).collect();
        if preview.len() < body.len() {
            preview.push_str("...");
        }
        context.insert("chorus.response_body".to_string(), Value::from(preview));
    }

    context
}
