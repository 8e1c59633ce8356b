//! # chorus-pro-rs
//!
//! A Rust client library for the Chorus Pro e-invoicing API operated by the
//! AIFE.
//!
//! ```no_run
//! use chorus_pro_rs::{Client, FluxSyntax, KeyPair, SubmitFlux};
//!
//! # async fn example() -> chorus_pro_rs::error::Result<()> {
//! let mut client = Client::new(true)?;
//! client.connect_with_oauth(&KeyPair::from_env()?).await?;
//! client.set_account_credentials("login", "password");
//!
//! let mut request = SubmitFlux::new();
//! request.set_flux_syntax(Some(FluxSyntax::InDpE2UblInvoiceMin));
//! request.set_flux_file("invoice.xml")?;
//!
//! let response = client.execute(&request).await?;
//! println!("{response:#?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Sentry Integration
//!
//! Remote errors ([`Error::Auth`] and [`Error::Api`]) carry a span trace
//! captured where they were created. Install `tracing_error::ErrorLayer` in
//! your subscriber to populate it:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())  // Required for SpanTrace capture
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```
//!
//! With the `sentry` feature enabled, errors also convert into Sentry
//! breadcrumbs.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod endpoints;
pub mod error;
pub mod oauth;
pub mod operations;
pub mod request;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::{Client, ClientBuilder, FluxApi};
pub use endpoints::Environment;
pub use error::Error;
pub use oauth::{AccountCredentials, KeyPair};
pub use operations::{FluxDeposit, FluxSyntax, Request, SubmitFlux};
pub use request::{ApiRequest, Response};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
