//! Submits a flux file to the Chorus Pro sandbox.
//!
//! ```text
//! cargo run --example submit_flux -- path/to/invoice.xml IN_DP_E2_UBL_INVOICE_MIN
//! ```

#[macro_use]
extern crate tracing;

use std::time::Duration;

use anyhow::{Context, Result};
use chorus_pro_rs::{AccountCredentials, Client, FluxSyntax, KeyPair, SubmitFlux};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let file = args.next().context("usage: submit_flux <file> [syntax]")?;
    let syntax: FluxSyntax = args
        .next()
        .as_deref()
        .unwrap_or(FluxSyntax::InDpE2UblInvoiceMin.as_str())
        .parse()?;

    let mut client = Client::builder()
        .sandbox(true)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()?;
    client.connect_with_oauth(&KeyPair::from_env()?).await?;
    client.set_account(AccountCredentials::from_env()?);

    let mut request = SubmitFlux::new();
    request.set_flux_syntax(Some(syntax));
    request.set_flux_file(&file)?;

    let deposit = client.flux().submit(&request).await?;
    info!("deposited flux: {:#?}", deposit);

    Ok(())
}
