use std::path::PathBuf;
use std::sync::Once;

use chorus_pro_rs::{Client, Environment};
use tracing::info;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/cpro/factures/v1";
pub const TOKEN_PATH: &str = "/api/oauth/token";

static LOGGING_CONFIGURED: Once = Once::new();

/// Setup before test runs
pub fn do_setup() {
    LOGGING_CONFIGURED.call_once(|| tracing_subscriber::fmt().with_test_writer().init());
    info!("Setting up test environment");
}

/// Environment pointing both endpoints at the mock server
#[allow(dead_code)]
pub fn mock_environment(server: &MockServer) -> Environment {
    Environment::custom(
        &format!("{}{API_PREFIX}", server.uri()),
        &format!("{}{TOKEN_PATH}", server.uri()),
    )
    .unwrap()
}

/// Creates a client talking to the mock server
#[allow(dead_code)]
pub fn mock_client(server: &MockServer) -> Client {
    Client::builder()
        .environment(mock_environment(server))
        .build()
        .unwrap()
}

/// Path of the small UBL invoice used as flux
#[allow(dead_code)]
pub fn fixture_invoice() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("facture_ubl_min.xml")
}
