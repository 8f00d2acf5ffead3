use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Balance, GatewayCode, GatewayReply};

// Free hosting in front of the gateway appends banners to every page, so only the
// leading status code is trusted.
static LEADING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+").expect("leading code pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("reply does not start with a status code")]
    MissingStatusCode,

    #[error("status code out of range: {digits}")]
    StatusCodeOutOfRange { digits: String },
}

pub fn decode_reply(body: &str) -> Result<GatewayReply, TransportError> {
    let digits = LEADING_CODE
        .find(body)
        .ok_or(TransportError::MissingStatusCode)?
        .as_str();

    let out_of_range = || TransportError::StatusCodeOutOfRange {
        digits: digits.to_owned(),
    };

    let code = digits.parse::<i64>().map_err(|_| out_of_range())?;
    match u64::try_from(code) {
        Ok(value) => Ok(GatewayReply::Accepted(Balance::new(value))),
        Err(_) => GatewayCode::new(code)
            .map(GatewayReply::Rejected)
            .map_err(|_| out_of_range()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(code: i64) -> GatewayReply {
        GatewayReply::Rejected(GatewayCode::new(code).unwrap())
    }

    #[test]
    fn positive_code_ignores_trailing_html() {
        let reply = decode_reply("42<html><body>ads</body></html>").unwrap();
        assert_eq!(reply, GatewayReply::Accepted(Balance::new(42)));
    }

    #[test]
    fn negative_code_ignores_trailer() {
        assert_eq!(decode_reply("-7 some trailer").unwrap(), rejected(-7));
        assert_eq!(decode_reply("-12\n<!-- hosting -->").unwrap(), rejected(-12));
    }

    #[test]
    fn bare_numbers_decode() {
        assert_eq!(
            decode_reply("0").unwrap(),
            GatewayReply::Accepted(Balance::new(0))
        );
        assert_eq!(
            decode_reply("-0").unwrap(),
            GatewayReply::Accepted(Balance::new(0))
        );
        assert_eq!(decode_reply("-1").unwrap(), rejected(-1));
    }

    #[test]
    fn non_ascii_digits_end_the_code() {
        let reply = decode_reply("42\u{0663}<html>ad</html>").unwrap();
        assert_eq!(reply, GatewayReply::Accepted(Balance::new(42)));

        let reply = decode_reply("-8\u{FF11}\u{FF12}").unwrap();
        assert_eq!(reply, rejected(-8));

        assert!(matches!(
            decode_reply("\u{0664}\u{0662}"),
            Err(TransportError::MissingStatusCode)
        ));
    }

    #[test]
    fn non_numeric_body_is_missing_status_code() {
        for body in ["error occurred", "", "-", " 42", "<html>42</html>", "+5"] {
            assert!(
                matches!(decode_reply(body), Err(TransportError::MissingStatusCode)),
                "body {body:?} should not decode"
            );
        }
    }

    #[test]
    fn oversized_code_is_out_of_range() {
        let err = decode_reply("99999999999999999999999 texts").unwrap_err();
        assert!(matches!(err, TransportError::StatusCodeOutOfRange { .. }));
    }
}
