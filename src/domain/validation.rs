use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidAccountId { input: String },
    AccountIdsExhausted,
    InvalidUrl { input: String },
    NonNegativeGatewayCode { actual: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidAccountId { input } => write!(f, "invalid account id: {input}"),
            Self::AccountIdsExhausted => f.write_str("no account ids left"),
            Self::InvalidUrl { input } => write!(f, "invalid gateway url: {input}"),
            Self::NonNegativeGatewayCode { actual } => {
                write!(f, "gateway error codes are negative, got {actual}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
