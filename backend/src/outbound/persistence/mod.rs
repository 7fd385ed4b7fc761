//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel row structs (`models`) and domain
//! types; row structs and the table definitions stay private to this module.
//! Connections come from a `bb8` pool via `diesel-async`.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselListingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/stays")).await?;
//! let listings = DieselListingRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_listing_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
