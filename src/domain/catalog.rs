use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value::GatewayCode;

/// Source of human-readable texts for gateway failures.
pub trait MessageCatalog: Send + Sync {
    /// Specific message for a code, keyed by the code's absolute value.
    fn lookup(&self, key: u64) -> Option<String>;

    /// Fallback message embedding the raw (negative) code.
    fn generic(&self, code: GatewayCode) -> String;

    /// Message for replies that do not start with a status code.
    fn unexpected_response(&self) -> String;
}

/// Map a gateway error code to text. Unknown codes degrade to the generic template.
pub fn describe(catalog: &dyn MessageCatalog, code: GatewayCode) -> String {
    catalog
        .lookup(code.catalog_key())
        .unwrap_or_else(|| catalog.generic(code))
}

const CODE_PLACEHOLDER: &str = "{code}";
const DEFAULT_GENERIC_TEMPLATE: &str = "Gateway returned error {code}";
const DEFAULT_UNEXPECTED_RESPONSE: &str = "Unexpected response from the gateway";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Catalog backed by an in-memory table.
///
/// `generic_template` may contain `{code}`, which is replaced by the raw code.
pub struct DefaultCatalog {
    messages: BTreeMap<u64, String>,
    generic_template: String,
    unexpected_response: String,
}

impl Default for DefaultCatalog {
    fn default() -> Self {
        Self {
            messages: BTreeMap::new(),
            generic_template: DEFAULT_GENERIC_TEMPLATE.to_owned(),
            unexpected_response: DEFAULT_UNEXPECTED_RESPONSE.to_owned(),
        }
    }
}

impl DefaultCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message for the code whose absolute value is `key`.
    pub fn with_message(mut self, key: u64, message: impl Into<String>) -> Self {
        self.messages.insert(key, message.into());
        self
    }

    pub fn with_generic_template(mut self, template: impl Into<String>) -> Self {
        self.generic_template = template.into();
        self
    }

    pub fn with_unexpected_response(mut self, message: impl Into<String>) -> Self {
        self.unexpected_response = message.into();
        self
    }
}

impl MessageCatalog for DefaultCatalog {
    fn lookup(&self, key: u64) -> Option<String> {
        self.messages.get(&key).cloned()
    }

    fn generic(&self, code: GatewayCode) -> String {
        self.generic_template
            .replace(CODE_PLACEHOLDER, &code.as_i64().to_string())
    }

    fn unexpected_response(&self) -> String {
        self.unexpected_response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: i64) -> GatewayCode {
        GatewayCode::new(value).unwrap()
    }

    #[test]
    fn registered_code_uses_specific_message() {
        let catalog = DefaultCatalog::new().with_message(5, "Invalid login");
        assert_eq!(describe(&catalog, code(-5)), "Invalid login");
    }

    #[test]
    fn unknown_code_falls_back_to_generic_template() {
        let catalog = DefaultCatalog::new().with_message(5, "Invalid login");
        assert_eq!(describe(&catalog, code(-3)), "Gateway returned error -3");
    }

    #[test]
    fn custom_templates_are_applied() {
        let catalog = DefaultCatalog::new()
            .with_generic_template("Fehler {code} vom Gateway")
            .with_unexpected_response("Unerwartete Antwort");
        assert_eq!(describe(&catalog, code(-12)), "Fehler -12 vom Gateway");
        assert_eq!(catalog.unexpected_response(), "Unerwartete Antwort");
    }

    #[test]
    fn deserializes_with_defaults() {
        let catalog: DefaultCatalog =
            serde_json::from_str(r#"{ "messages": { "2": "Out of texts" } }"#).unwrap();
        assert_eq!(describe(&catalog, code(-2)), "Out of texts");
        assert_eq!(describe(&catalog, code(-9)), "Gateway returned error -9");
        assert_eq!(
            catalog.unexpected_response(),
            "Unexpected response from the gateway"
        );
    }
}
