//! Driven port for review storage and the top-stays aggregate.

use async_trait::async_trait;

use crate::domain::{ListingId, Review, TopStay};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review store adapters.
    pub enum ReviewRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "review store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "review store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Reviews of one listing, newest first.
    async fn list_for_listing(
        &self,
        listing: &ListingId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Listings with at least `min_reviews` reviews ranked by average rating
    /// descending then name ascending, at most `limit` of them.
    async fn top_listings(
        &self,
        min_reviews: u64,
        limit: usize,
    ) -> Result<Vec<TopStay>, ReviewRepositoryError>;
}
