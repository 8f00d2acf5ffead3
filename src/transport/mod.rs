//! Transport layer: wire-format details of the gateway's form protocol.

mod form;
mod reply;

pub use form::{encode_balance_form, encode_send_form};
pub use reply::decode_reply;
