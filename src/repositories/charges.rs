use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::pix::Charge;

pub const DEFAULT_MAX_STORED: usize = 10_000;

/// Charges issued since the service started, capped at `limit` entries.
/// Inserting past the cap evicts the oldest charge by `created_at`.
#[derive(Clone)]
pub struct ChargeRepository {
    charges: Arc<DashMap<Uuid, Charge>>,
    limit: usize,
}

impl Default for ChargeRepository {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_STORED)
    }
}

impl ChargeRepository {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            charges: Arc::new(DashMap::new()),
            limit: limit.max(1),
        }
    }

    pub fn insert(&self, charge: Charge) {
        self.charges.insert(charge.id, charge);

        while self.charges.len() > self.limit {
            let oldest = self
                .charges
                .iter()
                .min_by_key(|entry| entry.value().created_at)
                .map(|entry| *entry.key());

            match oldest {
                Some(id) => {
                    log::debug!("Evicting Pix charge {}", id);
                    self.charges.remove(&id);
                }
                None => break,
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Charge> {
        self.charges.get(id).map(|entry| entry.value().clone())
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Charge> {
        let mut charges: Vec<Charge> = self
            .charges
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        charges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        charges
    }
}
