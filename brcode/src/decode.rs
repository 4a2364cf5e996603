//! Reading a static Pix payload back into its fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::crc;
use crate::error::DecodeError;
use crate::payload::{tag, DEFAULT_TX_ID, PAYLOAD_FORMAT, PIX_GUI};
use crate::tlv;

const CRC_HEADER_LEN: usize = 4;
const CRC_VALUE_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    pub pix_key: String,
    pub beneficiary_name: String,
    pub city: String,
    pub amount: Option<Decimal>,
    pub tx_id: String,
    pub merchant_category_code: String,
    pub currency: String,
    pub country: String,
}

/// Verifies the checksum of `payload` and extracts its fields.
///
/// Unknown top-level and nested tags are skipped.
pub fn decode(payload: &str) -> Result<DecodedPayload, DecodeError> {
    let body = verify_checksum(payload.trim())?;
    let fields = tlv::parse(body)?;

    let format = required(&fields, tag::PAYLOAD_FORMAT)?;
    if format != PAYLOAD_FORMAT {
        return Err(DecodeError::UnsupportedFormat(format.to_string()));
    }

    let account = tlv::parse(required(&fields, tag::MERCHANT_ACCOUNT)?)?;
    match tlv::find(&account, tag::GUI) {
        Some(gui) if gui.eq_ignore_ascii_case(PIX_GUI) => {}
        _ => return Err(DecodeError::MissingField("26.00")),
    }
    let pix_key = tlv::find(&account, tag::PIX_KEY).ok_or(DecodeError::MissingField("26.01"))?;

    let amount = tlv::find(&fields, tag::AMOUNT)
        .map(|value| {
            Decimal::from_str(value).map_err(|_| DecodeError::InvalidAmount(value.to_string()))
        })
        .transpose()?;

    let tx_id = match tlv::find(&fields, tag::ADDITIONAL_DATA) {
        Some(data) => tlv::find(&tlv::parse(data)?, tag::REFERENCE_LABEL)
            .unwrap_or(DEFAULT_TX_ID)
            .to_string(),
        None => DEFAULT_TX_ID.to_string(),
    };

    Ok(DecodedPayload {
        pix_key: pix_key.to_string(),
        beneficiary_name: required(&fields, tag::MERCHANT_NAME)?.to_string(),
        city: required(&fields, tag::MERCHANT_CITY)?.to_string(),
        amount,
        tx_id,
        merchant_category_code: required(&fields, tag::MERCHANT_CATEGORY_CODE)?.to_string(),
        currency: required(&fields, tag::CURRENCY)?.to_string(),
        country: required(&fields, tag::COUNTRY)?.to_string(),
    })
}

/// Returns the payload without its CRC field when the checksum matches.
fn verify_checksum(payload: &str) -> Result<&str, DecodeError> {
    let split = payload
        .len()
        .checked_sub(CRC_VALUE_LEN)
        .filter(|idx| payload.is_char_boundary(*idx))
        .ok_or(DecodeError::MissingChecksum)?;
    let (signed, found) = payload.split_at(split);

    let crc_header = format!("{}{:02}", tag::CRC, CRC_VALUE_LEN);
    if !signed.ends_with(&crc_header) {
        return Err(DecodeError::MissingChecksum);
    }

    let expected = crc::checksum(signed);
    if !found.eq_ignore_ascii_case(&expected) {
        log::debug!("Rejected payload with checksum {} (expected {})", found, expected);
        return Err(DecodeError::Checksum {
            expected,
            found: found.to_string(),
        });
    }

    Ok(&signed[..signed.len() - CRC_HEADER_LEN])
}

fn required<'a>(fields: &[tlv::Field<'a>], id: &'static str) -> Result<&'a str, DecodeError> {
    tlv::find(fields, id).ok_or(DecodeError::MissingField(id))
}
