//! Domain layer: strong types with validation and invariants (no I/O).

mod account;
mod catalog;
mod request;
mod response;
mod validation;
mod value;

pub use account::{Account, AccountDraft, DraftState, EditOutcome, EditSession, PendingDiscard};
pub use catalog::{DefaultCatalog, MessageCatalog, describe};
pub use request::{GatewayRequest, Operation, SendSms};
pub use response::GatewayReply;
pub use validation::ValidationError;
pub use value::{
    AccountId, Balance, GatewayCode, Label, MessageText, Password, PhoneNumber, ProviderCode,
    RawPhoneNumber, SenderName, Username,
};
