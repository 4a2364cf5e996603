//! Static Pix ("BR Code") payloads.
//!
//! Builds and reads the EMV merchant-presented QR payload used by Pix, with
//! its trailing CRC-16/CCITT-FALSE checksum.

pub mod crc;
pub mod decode;
pub mod error;
pub mod payload;
pub mod text;
pub mod tlv;

pub use decode::{decode, DecodedPayload};
pub use error::{DecodeError, PayloadError};
pub use payload::{generate_pix_payload, PixPayload, DEFAULT_TX_ID};
