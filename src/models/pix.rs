use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Charge request from the billing screens. Merchant fields left out are
/// taken from the configured merchant.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewCharge {
    pub pix_key: Option<String>,
    pub beneficiary_name: Option<String>,
    pub city: Option<String>,
    pub amount: Option<Decimal>,
    pub tx_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Charge {
    pub id: Uuid,
    pub tx_id: String,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DecodeRequest {
    pub payload: String,
}
