use async_trait::async_trait;
use brcode::{payload, DecodedPayload, PixPayload};
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::{RequestHandler, Service, ServiceError};
use crate::models::pix::{Charge, NewCharge};
use crate::repositories::charges::{ChargeRepository, DEFAULT_MAX_STORED};
use crate::settings::{Charges, Merchant};

pub enum PixServiceRequest {
    NewCharge {
        charge: NewCharge,
        response: oneshot::Sender<Result<Charge, ServiceError>>,
    },
    GetCharge {
        id: Uuid,
        response: oneshot::Sender<Result<Charge, ServiceError>>,
    },
    ListCharges {
        response: oneshot::Sender<Result<Vec<Charge>, ServiceError>>,
    },
    Decode {
        payload: String,
        response: oneshot::Sender<Result<DecodedPayload, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct PixRequestHandler {
    repository: ChargeRepository,
    merchant: Merchant,
    max_amount: Option<Decimal>,
}

impl PixRequestHandler {
    pub fn new(merchant: Merchant, charges: Charges) -> Self {
        let max_stored = charges.max_stored.unwrap_or(DEFAULT_MAX_STORED);

        PixRequestHandler {
            repository: ChargeRepository::with_limit(max_stored),
            merchant,
            max_amount: charges.max_amount,
        }
    }

    fn new_charge(&self, request: NewCharge) -> Result<Charge, ServiceError> {
        let amount = request.amount.map(payload::round_amount);
        if let (Some(requested), Some(rounded)) = (request.amount, amount) {
            if requested > Decimal::ZERO && rounded.is_zero() {
                return Err(ServiceError::Validation(format!(
                    "amount {} rounds to zero",
                    requested
                )));
            }
        }

        if let (Some(amount), Some(max_amount)) = (amount, self.max_amount) {
            if amount > max_amount {
                return Err(ServiceError::Validation(format!(
                    "amount {} is above the limit of {}",
                    amount, max_amount
                )));
            }
        }

        let payload = PixPayload {
            pix_key: request
                .pix_key
                .unwrap_or_else(|| self.merchant.pix_key.clone()),
            beneficiary_name: request
                .beneficiary_name
                .unwrap_or_else(|| self.merchant.beneficiary_name.clone()),
            city: request.city.unwrap_or_else(|| self.merchant.city.clone()),
            amount,
            tx_id: request.tx_id,
        };
        payload.validate()?;

        let charge = Charge {
            id: Uuid::new_v4(),
            tx_id: payload.tx_id().to_string(),
            amount: amount.filter(|amount| *amount > Decimal::ZERO),
            description: request.description,
            payload: payload.encode(),
            created_at: Utc::now(),
        };
        self.repository.insert(charge.clone());

        log::info!(
            "Created Pix charge: id={}, tx_id={}, amount={:?}",
            charge.id,
            charge.tx_id,
            charge.amount
        );
        Ok(charge)
    }

    fn get_charge(&self, id: Uuid) -> Result<Charge, ServiceError> {
        self.repository
            .get(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("charge {}", id)))
    }

    fn decode(&self, payload: &str) -> Result<DecodedPayload, ServiceError> {
        brcode::decode(payload).map_err(|e| {
            log::warn!("Could not decode Pix payload: {}", e);
            ServiceError::from(e)
        })
    }
}

#[async_trait]
impl RequestHandler<PixServiceRequest> for PixRequestHandler {
    async fn handle_request(&self, request: PixServiceRequest) {
        match request {
            PixServiceRequest::NewCharge { charge, response } => {
                let _ = response.send(self.new_charge(charge));
            }
            PixServiceRequest::GetCharge { id, response } => {
                let _ = response.send(self.get_charge(id));
            }
            PixServiceRequest::ListCharges { response } => {
                let _ = response.send(Ok(self.repository.list()));
            }
            PixServiceRequest::Decode { payload, response } => {
                let _ = response.send(self.decode(&payload));
            }
        }
    }
}

pub struct PixService;

impl PixService {
    pub fn new() -> Self {
        PixService {}
    }
}

#[async_trait]
impl Service<PixServiceRequest, PixRequestHandler> for PixService {
    fn name(&self) -> &'static str {
        "Pix"
    }
}
