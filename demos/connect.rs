#[macro_use]
extern crate tracing;

use anyhow::Result;
use chorus_pro_rs::{Client, KeyPair};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let sandbox = std::env::args().any(|arg| arg == "--sandbox");
    let mut client = Client::new(sandbox)?;
    client.connect_with_oauth(&KeyPair::from_env()?).await?;

    info!(
        environment = %client.environment(),
        "obtained bearer of {} characters",
        client.bearer().map_or(0, str::len)
    );
    Ok(())
}
