use url::Url;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, RawPhoneNumber, SenderName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of call made to the gateway.
pub enum Operation {
    Send,
    BalanceQuery,
}

#[derive(Debug, Clone)]
/// A message to deliver through one account.
pub struct SendSms {
    recipients: Vec<RawPhoneNumber>,
    text: MessageText,
    sender: Option<SenderName>,
}

impl SendSms {
    /// Create a send request; at least one recipient is required.
    pub fn new(
        recipients: Vec<RawPhoneNumber>,
        text: MessageText,
        sender: Option<SenderName>,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            text,
            sender,
        })
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn sender(&self) -> Option<&SenderName> {
        self.sender.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully resolved call: target URL plus ordered form parameters.
pub struct GatewayRequest {
    pub operation: Operation,
    pub url: Url,
    pub params: Vec<(String, String)>,
}
