//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: in-process document store, the default backend.
//! - **persistence**: PostgreSQL repositories built on Diesel.

pub mod memory;
pub mod persistence;
