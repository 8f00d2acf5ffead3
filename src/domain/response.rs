use crate::domain::value::{Balance, GatewayCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Status code at the head of a gateway reply.
pub enum GatewayReply {
    /// Non-negative code: the remaining balance (or a send acknowledgement).
    Accepted(Balance),
    /// Negative code: the gateway refused the request.
    Rejected(GatewayCode),
}
