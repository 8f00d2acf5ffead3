use std::fmt;
use std::str::FromStr;

use phonenumber::country;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Numeric account identifier.
///
/// Persisted as text (`account_<id>_label`) but compared and ordered numerically,
/// so `10` sorts after `2`.
pub struct AccountId(u32);

impl AccountId {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "id";

    /// Id handed out when no account exists yet.
    pub const FIRST: Self = Self(1);

    /// Wrap a numeric id.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// The id following this one, `None` once ids run out.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidAccountId {
                input: s.to_owned(),
            })
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Display name of an account.
///
/// Invariant: non-empty after trimming.
pub struct Label(String);

impl Label {
    /// Storage field name (`label`).
    pub const FIELD: &'static str = "label";

    /// Create a validated [`Label`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Login of an account at the mobile provider.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Storage field name (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Password of an account at the mobile provider.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Storage field name (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Routing token telling the gateway which mobile network to log in to.
///
/// Invariant: non-empty after trimming. The value is passed through untouched, so
/// codes unknown to this crate keep working.
pub struct ProviderCode(String);

impl ProviderCode {
    /// Storage field name (`provider`).
    pub const FIELD: &'static str = "provider";

    /// Vodafone routes through a dedicated gateway host.
    pub const VODAFONE: &'static str = "v";

    /// Listed-provider value meaning "use the free-text provider instead".
    pub const CUSTOM: &'static str = "custom";

    /// Create a validated [`ProviderCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the provider code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the Vodafone routing code.
    pub fn is_vodafone(&self) -> bool {
        self.0 == Self::VODAFONE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name shown to recipients.
///
/// Invariant: non-empty after trimming.
pub struct SenderName(String);

impl SenderName {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`SenderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text.
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated recipient number as sent to the gateway.
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "recipients";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality is based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Remaining credit (free texts) reported by the gateway for an account.
pub struct Balance(u64);

impl Balance {
    /// Wrap a balance value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the balance value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Negative status code returned by the gateway when a request is refused.
pub struct GatewayCode(i64);

impl GatewayCode {
    /// Wrap a gateway error code; only negative values are error codes.
    pub fn new(code: i64) -> Result<Self, ValidationError> {
        if code >= 0 {
            return Err(ValidationError::NonNegativeGatewayCode { actual: code });
        }
        Ok(Self(code))
    }

    /// The code exactly as sent by the gateway (negative).
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Catalog key for this code: its absolute value.
    pub fn catalog_key(self) -> u64 {
        self.0.unsigned_abs()
    }
}

impl fmt::Display for GatewayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let label = Label::new("  Home ").unwrap();
        assert_eq!(label.as_str(), "Home");
        assert!(Label::new("  ").is_err());

        let username = Username::new(" 0871234567 ").unwrap();
        assert_eq!(username.as_str(), "0871234567");
        assert!(Username::new("").is_err());

        let password = Password::new(" secret ").unwrap();
        assert_eq!(password.as_str(), " secret ");
        assert!(Password::new("").is_err());

        let provider = ProviderCode::new(" o2 ").unwrap();
        assert_eq!(provider.as_str(), "o2");
        assert!(!provider.is_vodafone());
        assert!(ProviderCode::new("v").unwrap().is_vodafone());

        let sender = SenderName::new(" Mike ").unwrap();
        assert_eq!(sender.as_str(), "Mike");

        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());
    }

    #[test]
    fn password_debug_hides_value() {
        let password = Password::new("hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn account_id_parses_and_orders_numerically() {
        let ten: AccountId = "10".parse().unwrap();
        let two: AccountId = " 2 ".parse().unwrap();
        assert!(two < ten);
        assert_eq!(ten.to_string(), "10");
        assert_eq!(two.next(), Some(AccountId::new(3)));
        assert_eq!(AccountId::new(u32::MAX).next(), None);
        assert!(matches!(
            "abc".parse::<AccountId>(),
            Err(ValidationError::InvalidAccountId { .. })
        ));
        assert!("-1".parse::<AccountId>().is_err());
    }

    #[test]
    fn raw_phone_number_trims_and_exposes_raw() {
        let raw = RawPhoneNumber::new(" +353871234567 ").unwrap();
        assert_eq!(raw.raw(), "+353871234567");
        assert!(RawPhoneNumber::new("").is_err());
    }

    #[test]
    fn phone_number_parsing_and_equality_use_e164() {
        let p1 = PhoneNumber::parse(None, "+353871234567").unwrap();
        let p2 = PhoneNumber::parse(None, "+353 87 123 4567").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+353871234567");

        let raw: RawPhoneNumber = p2.into();
        assert_eq!(raw.raw(), "+353871234567");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn gateway_code_must_be_negative() {
        let code = GatewayCode::new(-3).unwrap();
        assert_eq!(code.as_i64(), -3);
        assert_eq!(code.catalog_key(), 3);
        assert_eq!(code.to_string(), "-3");

        assert!(matches!(
            GatewayCode::new(0),
            Err(ValidationError::NonNegativeGatewayCode { actual: 0 })
        ));
    }
}
