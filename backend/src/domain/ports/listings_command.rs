//! Driving port for creating and editing listings.

use async_trait::async_trait;

use crate::domain::{
    Error, FlashSink, Listing, ListingDraft, ListingId, ListingPatch, RequestContext,
};

#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Validate and store a new listing authored by the acting user.
    ///
    /// Validation failures push one `error` notice per field and return an
    /// `invalid_request` error carrying `fieldErrors`.
    async fn create(
        &self,
        ctx: RequestContext,
        draft: ListingDraft,
        flashes: &dyn FlashSink,
    ) -> Result<Listing, Error>;

    /// Validate and apply an edit. Only the author may edit.
    async fn update(
        &self,
        ctx: RequestContext,
        id: ListingId,
        patch: ListingPatch,
        flashes: &dyn FlashSink,
    ) -> Result<Listing, Error>;
}
