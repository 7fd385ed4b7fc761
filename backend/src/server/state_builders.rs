//! Builds handler state from the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use backend::inbound::http::state::HttpState;
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DieselListingRepository, DieselReviewRepository, DieselUserRepository,
};

use super::ServerConfig;

/// PostgreSQL repositories when a pool is configured, otherwise one shared
/// in-memory store preloaded with the development accounts.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => {
            info!("listings stored in PostgreSQL");
            HttpState::from_repositories(
                Arc::new(DieselListingRepository::new(pool.clone())),
                Arc::new(DieselReviewRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                clock,
                config.listings,
            )
        }
        None => {
            info!("listings stored in memory with development accounts");
            let store = Arc::new(MemoryStore::with_fixture_accounts());
            HttpState::from_repositories(
                store.clone(),
                store.clone(),
                store,
                clock,
                config.listings,
            )
        }
    };
    web::Data::new(state)
}
