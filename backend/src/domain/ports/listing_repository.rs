//! Driven port for listing storage.

use async_trait::async_trait;

use crate::domain::{
    Listing, ListingFilter, ListingId, ListingPatch, ListingQuery, ScoredListing, TagCount, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing store adapters.
    pub enum ListingRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "listing store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "listing store query failed: {message}",
        /// Another listing already uses the slug.
        DuplicateSlug { slug: String } => "listing slug already taken: {slug}",
    }
}

/// Port for reading and writing listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Run a filter/sort/window query in a single call.
    async fn execute(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<ScoredListing>, ListingRepositoryError>;

    /// Count listings matching `filter`.
    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingRepositoryError>;

    /// Listing counts grouped by tag, in no particular order.
    async fn tag_counts(&self) -> Result<Vec<TagCount>, ListingRepositoryError>;

    /// Store a new listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Every stored slug starting with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ListingRepositoryError>;

    /// Atomically apply `patch` to the listing when `author` owns it.
    ///
    /// Returns `None` when no listing with that id and author exists.
    async fn update_owned(
        &self,
        id: &ListingId,
        author: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError>;
}
