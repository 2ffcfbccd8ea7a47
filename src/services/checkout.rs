//! Simulated hosted checkout
//!
//! Stands in for the third-party payment page. Every observed service is
//! free, so a zero amount settles immediately; any other amount is accepted
//! in test mode. Repeated requests with the same idempotency key return the
//! reference issued the first time, so a retried submission is never charged
//! twice.

use super::traits::{ChargeRequest, PaymentGateway, PaymentReference};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Default merchant name shown on the checkout
pub const DEFAULT_CHECKOUT_NAME: &str = "RegiPRO Government Services";

pub struct SimulatedCheckout {
    merchant_name: String,
    settled: Mutex<HashMap<Uuid, PaymentReference>>,
}

impl SimulatedCheckout {
    pub fn new(merchant_name: impl Into<String>) -> Self {
        Self {
            merchant_name: merchant_name.into(),
            settled: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct payments settled so far
    #[cfg(test)]
    pub fn settled_count(&self) -> usize {
        self.settled.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for SimulatedCheckout {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_NAME)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedCheckout {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentReference> {
        let mut settled = self
            .settled
            .lock()
            .map_err(|_| anyhow!("Checkout state poisoned"))?;

        if let Some(existing) = settled.get(&request.idempotency_key) {
            tracing::info!(
                "Checkout replayed {} for key {}",
                existing,
                request.idempotency_key
            );
            return Ok(existing.clone());
        }

        let reference = PaymentReference::new(format!("pay_{}", Uuid::new_v4().simple()));
        tracing::info!(
            "{}: {} {} paise for {} settled as {}",
            self.merchant_name,
            request.currency,
            request.amount_paise,
            request.description,
            reference
        );
        settled.insert(request.idempotency_key, reference.clone());
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: Uuid, amount_paise: u64) -> ChargeRequest {
        ChargeRequest {
            amount_paise,
            currency: "INR",
            description: "GST Registration".to_string(),
            idempotency_key: key,
        }
    }

    #[tokio::test]
    async fn test_zero_amount_settles() {
        let checkout = SimulatedCheckout::default();
        let reference = checkout.charge(&request(Uuid::new_v4(), 0)).await.unwrap();
        assert!(reference.as_str().starts_with("pay_"));
        assert_eq!(checkout.settled_count(), 1);
    }

    #[tokio::test]
    async fn test_same_key_is_charged_once() {
        let checkout = SimulatedCheckout::default();
        let key = Uuid::new_v4();
        let first = checkout.charge(&request(key, 49_900)).await.unwrap();
        let second = checkout.charge(&request(key, 49_900)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(checkout.settled_count(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_references() {
        let checkout = SimulatedCheckout::default();
        let a = tokio_test::block_on(checkout.charge(&request(Uuid::new_v4(), 0))).unwrap();
        let b = tokio_test::block_on(checkout.charge(&request(Uuid::new_v4(), 0))).unwrap();
        assert_ne!(a, b);
        assert_eq!(checkout.settled_count(), 2);
    }
}
