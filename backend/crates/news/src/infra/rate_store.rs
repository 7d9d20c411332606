//! Payout Rate Persistence
//!
//! The rate table lives in the local store under `payoutRates`, as the
//! same JSON the admin page edits.

use std::sync::Arc;

use platform::storage::{LocalStore, StorageError};

use crate::domain::payout::PayoutRates;

pub const PAYOUT_RATES_KEY: &str = "payoutRates";

#[derive(Debug, Clone)]
pub struct PayoutRateStore {
    store: Arc<LocalStore>,
}

impl PayoutRateStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// Saved rates, or the defaults when none are saved
    ///
    /// A malformed or invalid saved table is logged and ignored.
    pub fn load(&self) -> PayoutRates {
        match self.store.get_json::<PayoutRates>(PAYOUT_RATES_KEY) {
            Ok(Some(rates)) => match rates.validate() {
                Ok(()) => rates,
                Err(reason) => {
                    tracing::warn!(reason = %reason, "Ignoring invalid saved payout rates");
                    PayoutRates::default()
                }
            },
            Ok(None) => PayoutRates::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable saved payout rates");
                PayoutRates::default()
            }
        }
    }

    pub fn save(&self, rates: &PayoutRates) -> Result<(), StorageError> {
        self.store.set_json(PAYOUT_RATES_KEY, rates)?;
        tracing::info!("Payout rates saved");
        Ok(())
    }
}
