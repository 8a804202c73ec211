use thiserror::Error;

/// Wire-to-domain conversion failure.
///
/// Decode failures abort the whole enclosing batch operation: a malformed
/// gateway payload is treated exactly like an unreachable upstream, never
/// patched over with defaults or dropped from the result list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("unknown debate status code: {0}")]
    UnknownStatus(u8),
}
