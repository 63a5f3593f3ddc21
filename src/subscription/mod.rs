//! Subscription purchases against a pluggable billing backend.
//!
//! Purchases are simulated: no receipt validation and no lapse model. A
//! successful purchase or restore sets the stored tier to premium.

use tracing::info;

use crate::entitlement::SubscriptionTier;
use crate::errors::StoreResult;
use crate::store::SavingsStore;

/// Platform billing contract the embedding shell implements.
pub trait BillingBackend: Send + Sync {
    fn purchase_monthly(&self) -> StoreResult<()>;
    fn purchase_yearly(&self) -> StoreResult<()>;
    fn restore_purchases(&self) -> StoreResult<()>;
}

/// Stand-in backend that always succeeds.
#[derive(Debug, Default)]
pub struct SimulatedBilling;

impl BillingBackend for SimulatedBilling {
    fn purchase_monthly(&self) -> StoreResult<()> {
        Ok(())
    }

    fn purchase_yearly(&self) -> StoreResult<()> {
        Ok(())
    }

    fn restore_purchases(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Drives purchase flows and persists the resulting tier.
pub struct SubscriptionService {
    backend: Box<dyn BillingBackend>,
}

impl SubscriptionService {
    pub fn new(backend: Box<dyn BillingBackend>) -> Self {
        Self { backend }
    }

    pub fn simulated() -> Self {
        Self::new(Box::new(SimulatedBilling))
    }

    pub fn purchase_monthly(&self, store: &mut SavingsStore) -> StoreResult<()> {
        self.backend.purchase_monthly()?;
        store.set_tier(SubscriptionTier::Premium)?;
        info!("monthly subscription activated");
        Ok(())
    }

    pub fn purchase_yearly(&self, store: &mut SavingsStore) -> StoreResult<()> {
        self.backend.purchase_yearly()?;
        store.set_tier(SubscriptionTier::Premium)?;
        info!("yearly subscription activated");
        Ok(())
    }

    pub fn restore_purchases(&self, store: &mut SavingsStore) -> StoreResult<()> {
        self.backend.restore_purchases()?;
        store.set_tier(SubscriptionTier::Premium)?;
        info!("purchases restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    struct FailingBilling;

    impl BillingBackend for FailingBilling {
        fn purchase_monthly(&self) -> StoreResult<()> {
            Err(StoreError::InvalidInput("billing unavailable".into()))
        }

        fn purchase_yearly(&self) -> StoreResult<()> {
            Err(StoreError::InvalidInput("billing unavailable".into()))
        }

        fn restore_purchases(&self) -> StoreResult<()> {
            Err(StoreError::InvalidInput("billing unavailable".into()))
        }
    }

    fn open_store() -> SavingsStore {
        SavingsStore::open(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn successful_purchase_upgrades_and_persists_the_tier() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = SavingsStore::open(kv.clone());
        let service = SubscriptionService::simulated();
        service.purchase_monthly(&mut store).unwrap();
        assert_eq!(store.tier(), SubscriptionTier::Premium);

        let reopened = SavingsStore::open(kv);
        assert_eq!(reopened.tier(), SubscriptionTier::Premium);
    }

    #[test]
    fn restore_also_upgrades_the_tier() {
        let mut store = open_store();
        let service = SubscriptionService::simulated();
        service.restore_purchases(&mut store).unwrap();
        assert_eq!(store.tier(), SubscriptionTier::Premium);
    }

    #[test]
    fn failed_purchase_leaves_the_tier_untouched() {
        let mut store = open_store();
        let service = SubscriptionService::new(Box::new(FailingBilling));
        let err = service.purchase_yearly(&mut store);
        assert!(err.is_err());
        assert_eq!(store.tier(), SubscriptionTier::Free);
    }
}
