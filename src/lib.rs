#![doc(test(attr(deny(warnings))))]

//! Jarify Core holds the domain state, entitlement rules, and persistence
//! round-trip behind the Jarify savings tracker. Presentation shells embed
//! this crate and drive it through [`store::SavingsStore`].

pub mod backup;
pub mod domain;
pub mod entitlement;
pub mod errors;
pub mod notify;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Jarify Core tracing initialized.");
    });
}

pub use entitlement::{can_use_feature, limits_for, Feature, SubscriptionTier};
pub use errors::{StoreError, StoreResult};
pub use store::{NewJar, SavingsStore};

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
