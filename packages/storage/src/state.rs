// ABOUTME: Shared database state for request handlers
// ABOUTME: Bundles the pool with each storage layer built on it

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{PlanStorage, SubscriptionStorage};

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub plan_storage: Arc<PlanStorage>,
    pub subscription_storage: Arc<SubscriptionStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            plan_storage: Arc::new(PlanStorage::new(pool.clone())),
            subscription_storage: Arc::new(SubscriptionStorage::new(pool.clone())),
            pool,
        }
    }
}
