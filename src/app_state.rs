use sqlx::PgPool;

use crate::config;
use crate::services_cache::ServicesCache;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub services: ServicesCache,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config, services: ServicesCache) -> Self {
        Self { db, env, services }
    }
}
