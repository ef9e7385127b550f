//! Shared application state
//!
//! Holds the services and stores every handler needs. Built once at startup from the pool
//! and the token codec, then cloned into each worker.

use crate::db::{
    ClientStore, HealthProbe, PgClientStore, PgRequestStore, PgServiceCatalog, RequestStore,
    ServiceCatalog,
};
use crate::services::{AuthService, ReconciliationService};
use crypto_core::JwtCodec;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub requests: ReconciliationService,
    pub auth: AuthService,
    pub catalog: Arc<dyn ServiceCatalog>,
    pub health: Arc<dyn HealthProbe>,
    pub codec: Arc<JwtCodec>,
}

impl AppState {
    /// PostgreSQL-backed state
    pub fn new(pool: PgPool, codec: Arc<JwtCodec>) -> Self {
        Self::from_stores(
            Arc::new(PgRequestStore::new(pool.clone())),
            Arc::new(PgClientStore::new(pool.clone())),
            Arc::new(PgServiceCatalog::new(pool.clone())),
            Arc::new(pool),
            codec,
        )
    }

    pub fn from_stores(
        requests: Arc<dyn RequestStore>,
        clients: Arc<dyn ClientStore>,
        catalog: Arc<dyn ServiceCatalog>,
        health: Arc<dyn HealthProbe>,
        codec: Arc<JwtCodec>,
    ) -> Self {
        Self {
            requests: ReconciliationService::new(requests),
            auth: AuthService::new(clients, codec.clone()),
            catalog,
            health,
            codec,
        }
    }
}
