//! Multi-account client for the Cabbage SMS gateway.
//!
//! Cabbage is an HTTP relay that logs in to a mobile provider's web texting service
//! with an account's credentials. This crate keeps a domain layer of strong types, a
//! transport layer for the gateway's form protocol and its noisy text replies, a
//! registry over stored account preferences, and a client layer that sends through
//! one account or refreshes the balances of all accounts in parallel.
//!
//! ```rust,no_run
//! use cabbage::{
//!     AccountRegistry, CabbageClient, MemoryStore, MessageText, RawPhoneNumber, SendSms,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = AccountRegistry::new(MemoryStore::new());
//!     let accounts = registry.accounts();
//!     let client = CabbageClient::builder().build()?;
//!
//!     let request = SendSms::new(
//!         vec![RawPhoneNumber::new("0871234567")?],
//!         MessageText::new("hello")?,
//!         None,
//!     )?;
//!     if let Some(account) = accounts.first() {
//!         let remaining = client.send(account, &request).await?;
//!         println!("{} texts left", remaining);
//!     }
//!     client.update_all_balances(&accounts).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod registry;
mod transport;

pub use client::{
    AccountOutcome, BalanceBook, BalanceReport, CabbageClient, CabbageClientBuilder, CabbageError,
};
pub use config::{ConfigError, Endpoints, FormFields, GatewaySettings, Readiness};
pub use domain::{
    Account, AccountDraft, AccountId, Balance, DefaultCatalog, DraftState, EditOutcome,
    EditSession, GatewayCode, Label, MessageCatalog, MessageText, Password, PhoneNumber,
    ProviderCode, RawPhoneNumber, SenderName, SendSms, Username, ValidationError,
};
pub use registry::{AccountRegistry, MemoryStore, PreferenceStore};
