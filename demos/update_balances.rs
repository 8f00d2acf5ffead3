use std::io;

use cabbage::{AccountRegistry, CabbageClient, GatewaySettings, MemoryStore, PreferenceStore};
use tracing_subscriber::EnvFilter;

/// Loads `account_<id>_<field>=value` lines from the file named by `CABBAGE_ACCOUNTS`.
fn load_store() -> Result<MemoryStore, Box<dyn std::error::Error>> {
    let path = std::env::var("CABBAGE_ACCOUNTS").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CABBAGE_ACCOUNTS environment variable is required",
        )
    })?;

    let mut store = MemoryStore::new();
    for line in std::fs::read_to_string(path)?.lines() {
        if let Some((key, value)) = line.split_once('=') {
            store.set(key.trim(), value.trim());
        }
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = match std::env::var("CABBAGE_SETTINGS") {
        Ok(path) => GatewaySettings::from_json_str(&std::fs::read_to_string(path)?)?,
        Err(_) => GatewaySettings::default(),
    };

    let registry = AccountRegistry::new(load_store()?);
    let accounts = registry.accounts();
    let client = CabbageClient::builder().settings(settings).build()?;

    let report = client.refresh_balances(&accounts).await?;
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(balance) => println!("{}: {balance}", outcome.label),
            Err(err) => println!("{}: {err}", outcome.label),
        }
    }

    Ok(())
}
