use std::io;

use cabbage::{
    AccountDraft, AccountId, CabbageClient, MessageText, RawPhoneNumber, SendSms, SenderName,
};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let draft = AccountDraft {
        label: "demo".to_owned(),
        listed_provider: required("CABBAGE_PROVIDER")?,
        username: required("CABBAGE_USERNAME")?,
        password: required("CABBAGE_PASSWORD")?,
        ..AccountDraft::new(AccountId::FIRST)
    };
    let account = draft.to_account()?;

    let phone = RawPhoneNumber::new(required("CABBAGE_PHONE")?)?;
    let message = std::env::var("CABBAGE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the cabbage demo.".to_owned());
    let sender = std::env::var("CABBAGE_SENDER")
        .ok()
        .map(SenderName::new)
        .transpose()?;
    let request = SendSms::new(vec![phone], MessageText::new(message)?, sender)?;

    let mut builder = CabbageClient::builder();
    if let Ok(url) = std::env::var("CABBAGE_URL") {
        builder = builder.custom_url(url);
    }
    let client = builder.build()?;

    let remaining = client.send(&account, &request).await?;
    println!("sent, {remaining} texts left");

    Ok(())
}
