//! Error types for building and reading BR Code payloads.

use thiserror::Error;

/// A payload that would encode, but not to something a Pix reader accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("field {0} must not be empty")]
    EmptyField(&'static str),
    #[error("field {tag} is {len} characters long, the limit is 99")]
    FieldTooLong { tag: &'static str, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload does not end with a CRC field")]
    MissingChecksum,
    #[error("checksum mismatch: expected {expected}, found {found}")]
    Checksum { expected: String, found: String },
    #[error("payload truncated at offset {offset}")]
    Truncated { offset: usize },
    #[error("invalid length {length:?} at offset {offset}")]
    InvalidLength { offset: usize, length: String },
    #[error("unsupported payload format indicator {0:?}")]
    UnsupportedFormat(String),
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
}
