//! Stays backend: a listings catalogue with search, tags, reviews, and an
//! author-only edit flow, served over actix-web.
//!
//! The crate follows a ports-and-adapters layout. [`domain`] holds the
//! listing rules and port traits, [`inbound`] the HTTP adapter, and
//! [`outbound`] the in-memory and PostgreSQL stores.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
