//! Assembly of a static Pix payload.
//!
//! Readers parse the payload positionally, so fields are always written in
//! the order below:
//!
//! | tag | field                          | value                         |
//! |-----|--------------------------------|-------------------------------|
//! | 00  | payload format indicator       | `01`                          |
//! | 26  | merchant account information   | `00` GUI + `01` pix key       |
//! | 52  | merchant category code         | `0000`                        |
//! | 53  | transaction currency           | `986` (BRL)                   |
//! | 54  | transaction amount (optional)  | `10.00`                       |
//! | 58  | country code                   | `BR`                          |
//! | 59  | merchant name                  | up to 25 chars, no accents    |
//! | 60  | merchant city                  | up to 15 chars, no accents    |
//! | 62  | additional data field template | `05` reference label (tx id)  |
//! | 63  | CRC-16/CCITT-FALSE             | 4 uppercase hex digits        |

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::crc;
use crate::error::PayloadError;
use crate::text;
use crate::tlv::{self, MAX_VALUE_LEN};

/// Reference label meaning "no specific transaction".
pub const DEFAULT_TX_ID: &str = "***";
/// Globally unique identifier of the Pix arrangement.
pub const PIX_GUI: &str = "br.gov.bcb.pix";

pub const PAYLOAD_FORMAT: &str = "01";
pub const MERCHANT_CATEGORY_CODE: &str = "0000";
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";

pub const MAX_NAME_LEN: usize = 25;
pub const MAX_CITY_LEN: usize = 15;

pub mod tag {
    pub const PAYLOAD_FORMAT: &str = "00";
    pub const MERCHANT_ACCOUNT: &str = "26";
    pub const MERCHANT_CATEGORY_CODE: &str = "52";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const MERCHANT_NAME: &str = "59";
    pub const MERCHANT_CITY: &str = "60";
    pub const ADDITIONAL_DATA: &str = "62";
    pub const CRC: &str = "63";

    /// Inside tag 26.
    pub const GUI: &str = "00";
    /// Inside tag 26.
    pub const PIX_KEY: &str = "01";
    /// Inside tag 62.
    pub const REFERENCE_LABEL: &str = "05";
}

/// Tag and length of the CRC field, written before the checksum is computed.
const CRC_PLACEHOLDER: &str = "6304";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixPayload {
    pub pix_key: String,
    pub beneficiary_name: String,
    pub city: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub tx_id: Option<String>,
}

impl PixPayload {
    pub fn new(
        pix_key: impl Into<String>,
        beneficiary_name: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            pix_key: pix_key.into(),
            beneficiary_name: beneficiary_name.into(),
            city: city.into(),
            amount: None,
            tx_id: None,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_tx_id(mut self, tx_id: impl Into<String>) -> Self {
        self.tx_id = Some(tx_id.into());
        self
    }

    pub fn tx_id(&self) -> &str {
        self.tx_id.as_deref().unwrap_or(DEFAULT_TX_ID)
    }

    /// Value of tag 54, or `None` when the amount is absent or not positive.
    pub fn encoded_amount(&self) -> Option<String> {
        self.amount
            .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
            .map(format_amount)
    }

    pub fn merchant_name(&self) -> String {
        text::sanitize(&self.beneficiary_name, MAX_NAME_LEN)
    }

    pub fn merchant_city(&self) -> String {
        text::sanitize(&self.city, MAX_CITY_LEN)
    }

    fn merchant_account(&self) -> String {
        let mut value = tlv::field(tag::GUI, PIX_GUI);
        value.push_str(&tlv::field(tag::PIX_KEY, &self.pix_key));
        value
    }

    fn additional_data(&self) -> String {
        tlv::field(tag::REFERENCE_LABEL, self.tx_id())
    }

    /// Serializes the payload, checksum included.
    ///
    /// Never fails: empty or oversized inputs still produce a string with a
    /// valid checksum. Use [`PixPayload::validate`] first when the inputs
    /// come from users.
    pub fn encode(&self) -> String {
        let merchant_account = self.merchant_account();
        let additional_data = self.additional_data();

        if let Err(e) = self.validate_lengths(&merchant_account, &additional_data) {
            log::warn!("Encoding non-conformant Pix payload: {}", e);
        }

        let mut payload = String::with_capacity(128);
        payload.push_str(&tlv::field(tag::PAYLOAD_FORMAT, PAYLOAD_FORMAT));
        payload.push_str(&tlv::field(tag::MERCHANT_ACCOUNT, &merchant_account));
        payload.push_str(&tlv::field(
            tag::MERCHANT_CATEGORY_CODE,
            MERCHANT_CATEGORY_CODE,
        ));
        payload.push_str(&tlv::field(tag::CURRENCY, CURRENCY_BRL));
        if let Some(amount) = self.encoded_amount() {
            payload.push_str(&tlv::field(tag::AMOUNT, &amount));
        }
        payload.push_str(&tlv::field(tag::COUNTRY, COUNTRY_CODE));
        payload.push_str(&tlv::field(tag::MERCHANT_NAME, &self.merchant_name()));
        payload.push_str(&tlv::field(tag::MERCHANT_CITY, &self.merchant_city()));
        payload.push_str(&tlv::field(tag::ADDITIONAL_DATA, &additional_data));
        payload.push_str(CRC_PLACEHOLDER);

        let checksum = crc::checksum(&payload);
        payload.push_str(&checksum);
        payload
    }

    /// Checks that every field fits its length prefix and that the
    /// merchant fields are present.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.pix_key.trim().is_empty() {
            return Err(PayloadError::EmptyField("pix_key"));
        }
        if self.merchant_name().trim().is_empty() {
            return Err(PayloadError::EmptyField("beneficiary_name"));
        }
        if self.merchant_city().trim().is_empty() {
            return Err(PayloadError::EmptyField("city"));
        }

        self.validate_lengths(&self.merchant_account(), &self.additional_data())
    }

    fn validate_lengths(
        &self,
        merchant_account: &str,
        additional_data: &str,
    ) -> Result<(), PayloadError> {
        let amount = self.encoded_amount().unwrap_or_default();
        let checks = [
            (tag::MERCHANT_ACCOUNT, merchant_account),
            (tag::AMOUNT, amount.as_str()),
            (tag::ADDITIONAL_DATA, additional_data),
        ];

        for (tag, value) in checks {
            let len = value.chars().count();
            if len > MAX_VALUE_LEN {
                return Err(PayloadError::FieldTooLong { tag, len });
            }
        }
        Ok(())
    }
}

/// Rounds to cents, midpoint away from zero. This is the value tag 54 carries.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimal places, e.g. `10` -> `10.00`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    rounded.rescale(2);
    rounded.to_string()
}

/// Builds a static Pix payload.
///
/// `amount` is omitted from the payload when `None` or not positive, and
/// `tx_id` defaults to [`DEFAULT_TX_ID`].
pub fn generate_pix_payload(
    pix_key: &str,
    beneficiary_name: &str,
    city: &str,
    amount: Option<Decimal>,
    tx_id: Option<&str>,
) -> String {
    PixPayload {
        pix_key: pix_key.to_string(),
        beneficiary_name: beneficiary_name.to_string(),
        city: city.to_string(),
        amount,
        tx_id: tx_id.map(str::to_string),
    }
    .encode()
}
