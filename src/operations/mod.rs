//! The Chorus Pro operations supported by this crate.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::request::{ApiRequest, Sealed};

pub mod submit_flux;

pub use submit_flux::{FluxDeposit, FluxSyntax, SubmitFlux};

/// Any supported operation.
#[derive(Debug, Clone)]
pub enum Request {
    /// `POST /deposer/flux`
    SubmitFlux(SubmitFlux),
}

impl Sealed for Request {}

impl ApiRequest for Request {
    fn path(&self) -> &'static str {
        match self {
            Self::SubmitFlux(request) => request.path(),
        }
    }

    fn post_fields(&self) -> Result<Map<String, Value>> {
        match self {
            Self::SubmitFlux(request) => request.post_fields(),
        }
    }
}

impl From<SubmitFlux> for Request {
    fn from(request: SubmitFlux) -> Self {
        Self::SubmitFlux(request)
    }
}
