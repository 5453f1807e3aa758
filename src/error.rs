//! Unified error type for the protocol core.
//!
//! Hand-rolled `Display`/`Error`/`From` impls, matching the style already
//! used by `wip_common_rs::packet::core::exceptions` rather than pulling in
//! a derive-macro error crate.

use std::fmt;

#[derive(Debug)]
pub enum WipError {
    /// Bytes could not be parsed, or facade-level inputs were insufficient.
    InvalidPacket(String),
    /// Stored checksum did not match the recomputed one.
    ChecksumMismatch,
    /// Overall transaction deadline elapsed without a matching response.
    Timeout,
    /// Socket creation, send, receive, or resolution failure.
    Io(std::io::Error),
    /// Response-auth verification failed, or a required MAC was absent.
    AuthFailure(String),
    /// Optional feature not built in.
    NotImplemented(&'static str),
}

impl fmt::Display for WipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WipError::InvalidPacket(msg) => write!(f, "invalid packet: {msg}"),
            WipError::ChecksumMismatch => write!(f, "checksum mismatch"),
            WipError::Timeout => write!(f, "transaction deadline elapsed"),
            WipError::Io(e) => write!(f, "io error: {e}"),
            WipError::AuthFailure(msg) => write!(f, "auth failure: {msg}"),
            WipError::NotImplemented(what) => write!(f, "not implemented: {what}"),
        }
    }
}

impl std::error::Error for WipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WipError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WipError {
    fn from(e: std::io::Error) -> Self {
        WipError::Io(e)
    }
}

pub type WipResult<T> = Result<T, WipError>;
