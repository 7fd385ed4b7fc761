//! Driving port for leaving reviews.

use async_trait::async_trait;

use crate::domain::{Error, FlashSink, ListingId, RequestContext, Review, ReviewDraft};

#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Store a review by the acting user on `listing`.
    async fn add_review(
        &self,
        ctx: RequestContext,
        listing: ListingId,
        draft: ReviewDraft,
        flashes: &dyn FlashSink,
    ) -> Result<Review, Error>;
}
