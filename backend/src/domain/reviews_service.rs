//! Review service implementing [`ReviewsCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::listings_service::{map_listing_error, map_review_error, reject_fields};
use crate::domain::ports::{ListingRepository, ReviewRepository, ReviewsCommand};
use crate::domain::{
    Error, FlashNotice, FlashSink, ListingId, RequestContext, Review, ReviewDraft, ReviewId,
    validate_review_draft,
};

#[derive(Clone)]
pub struct ReviewsService<L, R> {
    listings: Arc<L>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<L, R> ReviewsService<L, R> {
    pub fn new(listings: Arc<L>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            reviews,
            clock,
        }
    }
}

#[async_trait]
impl<L, R> ReviewsCommand for ReviewsService<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    async fn add_review(
        &self,
        ctx: RequestContext,
        listing: ListingId,
        draft: ReviewDraft,
        flashes: &dyn FlashSink,
    ) -> Result<Review, Error> {
        let author = ctx.require_user()?;
        let errors = validate_review_draft(&draft);
        if !errors.is_empty() {
            return Err(reject_fields(&errors, flashes));
        }

        self.listings
            .find_by_id(&listing)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found("stay not found"))?;

        let review = Review::from_draft(
            ReviewId::random(),
            author,
            listing,
            &draft,
            self.clock.utc(),
        )
        .ok_or_else(|| Error::invalid_request("rating must be between 1 and 5"))?;

        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;

        info!(stay = %listing, rating = review.rating(), "review saved");
        flashes.push(FlashNotice::success("Review Saved!"));
        Ok(review)
    }
}
