//! Submission of an invoicing flux (`/deposer/flux`).
//!
//! # Example
//!
//! ```no_run
//! use chorus_pro_rs::{Client, FluxSyntax, KeyPair, SubmitFlux};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new(true)?;
//! client.connect_with_oauth(&KeyPair::from_env()?).await?;
//! client.set_account_credentials("login", "password");
//!
//! let mut request = SubmitFlux::new();
//! request.set_flux_syntax(Some(FluxSyntax::InDpE2UblInvoiceMin));
//! request.set_flux_file("invoice.xml")?;
//!
//! let deposit = client.flux().submit(&request).await?;
//! println!("flux {} deposited on {}", deposit.numero_flux_depot, deposit.date_depot);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::Date;

use crate::{
    error::{Error, Result},
    request::{ApiRequest, Response, Sealed},
    utils::{date_format::iso_date_format, serde_helpers::string_or_number},
};

pub const PATH: &str = "/deposer/flux";

/// Longest file name accepted by the API, in characters.
pub const MAX_FILE_NAME_LEN: usize = 200;

/// Format of the submitted flux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluxSyntax {
    /// UBL invoice, full profile
    #[serde(rename = "IN_DP_E1_UBL_INVOICE")]
    InDpE1UblInvoice,
    /// UN/CEFACT CII D16B, full profile
    #[serde(rename = "IN_DP_E1_CII_16B")]
    InDpE1Cii16b,
    /// PES invoice, full profile
    #[serde(rename = "IN_DP_E1_PES_FACTURE")]
    InDpE1PesFacture,
    /// xCBL invoice
    #[serde(rename = "IN_DP_E1_XCBL")]
    InDpE1Xcbl,
    /// UBL invoice, minimal profile
    #[serde(rename = "IN_DP_E2_UBL_INVOICE_MIN")]
    InDpE2UblInvoiceMin,
    /// UN/CEFACT CII D16B, minimal profile
    #[serde(rename = "IN_DP_E2_CII_MIN_16B")]
    InDpE2CiiMin16b,
    /// Factur-X (PDF/A-3 with embedded CII)
    #[serde(rename = "IN_DP_E2_CII_FACTURX")]
    InDpE2CiiFacturx,
    /// PES invoice, minimal profile
    #[serde(rename = "IN_DP_E2_PES_FACTURE_MIN")]
    InDpE2PesFactureMin,
    /// Chorus Pro proprietary format, minimal profile
    #[serde(rename = "IN_DP_E2_CPP_FACTURE_MIN")]
    InDpE2CppFactureMin,
}

impl FluxSyntax {
    pub const ALL: [Self; 9] = [
        Self::InDpE1UblInvoice,
        Self::InDpE1Cii16b,
        Self::InDpE1PesFacture,
        Self::InDpE1Xcbl,
        Self::InDpE2UblInvoiceMin,
        Self::InDpE2CiiMin16b,
        Self::InDpE2CiiFacturx,
        Self::InDpE2PesFactureMin,
        Self::InDpE2CppFactureMin,
    ];

    /// The code sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InDpE1UblInvoice => "IN_DP_E1_UBL_INVOICE",
            Self::InDpE1Cii16b => "IN_DP_E1_CII_16B",
            Self::InDpE1PesFacture => "IN_DP_E1_PES_FACTURE",
            Self::InDpE1Xcbl => "IN_DP_E1_XCBL",
            Self::InDpE2UblInvoiceMin => "IN_DP_E2_UBL_INVOICE_MIN",
            Self::InDpE2CiiMin16b => "IN_DP_E2_CII_MIN_16B",
            Self::InDpE2CiiFacturx => "IN_DP_E2_CII_FACTURX",
            Self::InDpE2PesFactureMin => "IN_DP_E2_PES_FACTURE_MIN",
            Self::InDpE2CppFactureMin => "IN_DP_E2_CPP_FACTURE_MIN",
        }
    }
}

impl fmt::Display for FluxSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FluxSyntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|syntax| syntax.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown flux syntax: {s}")))
    }
}

/// Request submitting an invoicing flux file.
#[derive(Debug, Clone, Default)]
pub struct SubmitFlux {
    current_user_id: Option<i64>,
    flux_file: Option<PathBuf>,
    file_name: Option<String>,
    flux_syntax: Option<FluxSyntax>,
    signed: Option<String>,
}

impl SubmitFlux {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Technical id of the current user in Chorus Pro.
    pub fn set_current_user_id(&mut self, current_user_id: Option<i64>) {
        self.current_user_id = current_user_id;
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<i64> {
        self.current_user_id
    }

    /// Sets the file to submit.
    ///
    /// The path must exist and must not be a directory. When no file name has
    /// been set yet, the file's base name is used.
    pub fn set_flux_file(&mut self, flux_file: impl AsRef<Path>) -> Result<()> {
        let path = flux_file.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;

        if metadata.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "{} is a directory",
                path.display()
            )));
        }

        self.flux_file = Some(path.to_path_buf());

        if self.file_name.as_deref().is_none_or(str::is_empty) {
            let base_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            self.set_file_name(base_name);
        }
        Ok(())
    }

    #[must_use]
    pub fn flux_file(&self) -> Option<&Path> {
        self.flux_file.as_deref()
    }

    /// File name with its extension. Only the last 200 characters are kept.
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name.map(|name| last_chars(&name, MAX_FILE_NAME_LEN).to_string());
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_flux_syntax(&mut self, flux_syntax: Option<FluxSyntax>) {
        self.flux_syntax = flux_syntax;
    }

    #[must_use]
    pub fn flux_syntax(&self) -> Option<FluxSyntax> {
        self.flux_syntax
    }

    /// Whether the file has been signed.
    pub fn set_signed(&mut self, signed: Option<String>) {
        self.signed = signed;
    }

    #[must_use]
    pub fn signed(&self) -> Option<&str> {
        self.signed.as_deref()
    }

    fn encoded_file(path: &Path) -> Result<String> {
        let content = std::fs::read(path).map_err(|e| file_error(path, e))?;
        trace!(path = %path.display(), size = content.len(), "encoding flux file");
        Ok(STANDARD.encode(content))
    }
}

impl Sealed for SubmitFlux {}

impl ApiRequest for SubmitFlux {
    fn path(&self) -> &'static str {
        PATH
    }

    fn post_fields(&self) -> Result<Map<String, Value>> {
        let mut fields = Map::new();

        if let Some(current_user_id) = self.current_user_id {
            fields.insert("idUtilisateurCourant".into(), current_user_id.into());
        }

        let flux_file = self.flux_file.as_deref().ok_or(Error::MissingField {
            field: "fichierFlux",
        })?;
        fields.insert("fichierFlux".into(), Self::encoded_file(flux_file)?.into());

        let file_name = self.file_name.as_ref().ok_or(Error::MissingField {
            field: "nomFichier",
        })?;
        fields.insert("nomFichier".into(), file_name.clone().into());

        let flux_syntax = self.flux_syntax.ok_or(Error::MissingField {
            field: "syntaxeFlux",
        })?;
        fields.insert("syntaxeFlux".into(), flux_syntax.as_str().into());

        if let Some(signed) = &self.signed {
            fields.insert("avecSignature".into(), signed.clone().into());
        }

        Ok(fields)
    }
}

/// Typed view of a successful `/deposer/flux` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FluxDeposit {
    pub code_retour: i64,
    pub libelle: String,
    #[serde(deserialize_with = "string_or_number")]
    pub numero_flux_depot: String,
    #[serde(with = "iso_date_format")]
    pub date_depot: Date,
    pub syntaxe_flux: FluxSyntax,
}

impl TryFrom<Response> for FluxDeposit {
    type Error = Error;

    fn try_from(response: Response) -> Result<Self> {
        let value = Value::Object(response);
        serde_json::from_value(value.clone())
            .map_err(|e| Error::DeserializationError(e, Some(value.to_string())))
    }
}

fn file_error(path: &Path, e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    }
}

/// The last `max` characters of `value`.
fn last_chars(value: &str, max: usize) -> &str {
    match value.char_indices().rev().nth(max.saturating_sub(1)) {
        Some((index, _)) if max > 0 => &value[index..],
        Some(_) => "",
        None => value,
    }
}
