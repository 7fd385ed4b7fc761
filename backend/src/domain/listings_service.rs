//! Listing services implementing the listing driving ports.
//!
//! Reads that do not depend on each other (a page and its total, tag counts
//! and the tagged listings) are issued concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use mockable::Clock;
use pagination::{Page, PageNumber, PageRequest, PageResolution, PageSize};
use tracing::{debug, info};

use crate::domain::ports::{
    BrowseOutcome, ListingForm, ListingRepository, ListingRepositoryError, ListingsCommand,
    ListingsQuery, ReviewRepository, ReviewRepositoryError, SearchResponse, StayDetail,
    TagsResponse,
};
use crate::domain::{
    Error, FieldError, FlashNotice, FlashSink, Listing, ListingDraft, ListingFilter, ListingId,
    ListingIdentity, ListingPatch, ListingQuery, RequestContext, TopStay, assert_owner,
    next_available_slug, slugify, sort_tag_counts, validate_listing_draft, validate_listing_patch,
    validation_failure,
};

/// Minimum number of reviews before a listing is ranked.
pub const TOP_STAYS_MIN_REVIEWS: u64 = 2;
/// Maximum number of ranked listings returned.
pub const TOP_STAYS_LIMIT: usize = 10;
/// Upper bound on text search results; configuration may only lower it.
pub const SEARCH_LIMIT: u32 = 5;

pub(crate) fn map_listing_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing store unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing store error: {message}"))
        }
        ListingRepositoryError::DuplicateSlug { slug } => {
            Error::conflict(format!("a stay with slug {slug} already exists"))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review store error: {message}"))
        }
    }
}

/// Push one `error` notice per rejected field and build the matching error.
pub(crate) fn reject_fields(errors: &[FieldError], flashes: &dyn FlashSink) -> Error {
    for error in errors {
        flashes.push(FlashNotice::error(error.message()));
    }
    validation_failure(errors)
}

fn stay_not_found() -> Error {
    Error::not_found("stay not found")
}

/// Tunables for listing reads.
#[derive(Debug, Clone, Copy)]
pub struct ListingsSettings {
    pub page_size: PageSize,
    pub search_limit: u32,
}

impl Default for ListingsSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::DEFAULT,
            search_limit: SEARCH_LIMIT,
        }
    }
}

/// Service implementing [`ListingsQuery`] and [`ListingsCommand`].
#[derive(Clone)]
pub struct ListingsService<L, R> {
    listings: Arc<L>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
    settings: ListingsSettings,
}

impl<L, R> ListingsService<L, R> {
    pub fn new(
        listings: Arc<L>,
        reviews: Arc<R>,
        clock: Arc<dyn Clock>,
        settings: ListingsSettings,
    ) -> Self {
        Self {
            listings,
            reviews,
            clock,
            settings,
        }
    }
}

impl<L, R> ListingsService<L, R>
where
    L: ListingRepository,
{
    async fn owned_listing(&self, ctx: RequestContext, id: ListingId) -> Result<Listing, Error> {
        let user = ctx.require_user()?;
        let listing = self
            .listings
            .find_by_id(&id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(stay_not_found)?;
        assert_owner(&listing, user)?;
        Ok(listing)
    }
}

#[async_trait]
impl<L, R> ListingsQuery for ListingsService<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    async fn browse(
        &self,
        raw_page: Option<&str>,
        flashes: &dyn FlashSink,
    ) -> Result<BrowseOutcome, Error> {
        let request = PageRequest::new(PageNumber::parse_lenient(raw_page), self.settings.page_size);
        let filter = ListingFilter::All;
        let query =
            ListingQuery::new(filter.clone()).with_window(request.skip(), Some(request.limit()));

        let (rows, count) = try_join!(self.listings.execute(&query), self.listings.count(&filter))
            .map_err(map_listing_error)?;

        match request.resolve(rows.len(), count) {
            PageResolution::Render => {
                let stays = rows.into_iter().map(Listing::from).collect();
                Ok(BrowseOutcome::Page(Page::new(&request, stays, count)))
            }
            PageResolution::RedirectTo(target) => {
                debug!(requested = %request.page(), %target, "page past the end");
                flashes.push(FlashNotice::info(format!(
                    "You asked for page {}. But that does not exist. So I put you on page {}",
                    request.page(),
                    target
                )));
                Ok(BrowseOutcome::Redirect(target))
            }
        }
    }

    async fn search(&self, query: Option<&str>) -> Result<SearchResponse, Error> {
        let text = query.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(Error::invalid_request("search query must not be empty"));
        }

        let limit = self.settings.search_limit.min(SEARCH_LIMIT);
        let rows = self
            .listings
            .execute(&ListingQuery::text_search(text, limit))
            .await
            .map_err(map_listing_error)?;
        let stays: Vec<Listing> = rows.into_iter().map(Listing::from).collect();
        Ok(SearchResponse {
            length: stays.len(),
            stays,
        })
    }

    async fn tags(&self, tag: Option<&str>) -> Result<TagsResponse, Error> {
        let tag = tag.map(str::trim).filter(|value| !value.is_empty());
        let query = ListingQuery::new(ListingFilter::for_tag(tag));

        let (mut tags, rows) = try_join!(self.listings.tag_counts(), self.listings.execute(&query))
            .map_err(map_listing_error)?;
        sort_tag_counts(&mut tags);

        Ok(TagsResponse {
            tags,
            stays: rows.into_iter().map(Listing::from).collect(),
            tag: tag.map(str::to_owned),
        })
    }

    async fn stay_by_slug(&self, slug: &str) -> Result<StayDetail, Error> {
        let stay = self
            .listings
            .find_by_slug(slug)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(stay_not_found)?;
        let reviews = self
            .reviews
            .list_for_listing(&stay.id())
            .await
            .map_err(map_review_error)?;
        Ok(StayDetail { stay, reviews })
    }

    async fn top_stays(&self) -> Result<Vec<TopStay>, Error> {
        self.reviews
            .top_listings(TOP_STAYS_MIN_REVIEWS, TOP_STAYS_LIMIT)
            .await
            .map_err(map_review_error)
    }

    async fn add_form(&self, ctx: RequestContext) -> Result<ListingForm, Error> {
        ctx.require_user()?;
        Ok(ListingForm {
            title: "Add Stay".to_owned(),
            stay: None,
        })
    }

    async fn edit_form(&self, ctx: RequestContext, id: ListingId) -> Result<ListingForm, Error> {
        let listing = self.owned_listing(ctx, id).await?;
        Ok(ListingForm {
            title: format!("Edit {}", listing.name()),
            stay: Some(listing),
        })
    }
}

#[async_trait]
impl<L, R> ListingsCommand for ListingsService<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    async fn create(
        &self,
        ctx: RequestContext,
        draft: ListingDraft,
        flashes: &dyn FlashSink,
    ) -> Result<Listing, Error> {
        let author = ctx.require_user()?;
        let errors = validate_listing_draft(&draft);
        if !errors.is_empty() {
            return Err(reject_fields(&errors, flashes));
        }

        let base = slugify(&draft.name);
        let taken = self
            .listings
            .slugs_with_prefix(&base)
            .await
            .map_err(map_listing_error)?;
        let listing = Listing::from_draft(
            ListingIdentity {
                id: ListingId::random(),
                slug: next_available_slug(&base, &taken),
                author,
                created: self.clock.utc(),
            },
            &draft,
        );

        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;

        info!(stay = %listing.id(), slug = listing.slug(), "stay created");
        flashes.push(FlashNotice::success(format!(
            "Successfully Created {}.",
            listing.name()
        )));
        Ok(listing)
    }

    async fn update(
        &self,
        ctx: RequestContext,
        id: ListingId,
        patch: ListingPatch,
        flashes: &dyn FlashSink,
    ) -> Result<Listing, Error> {
        let current = self.owned_listing(ctx, id).await?;
        let errors = validate_listing_patch(&patch);
        if !errors.is_empty() {
            return Err(reject_fields(&errors, flashes));
        }

        let updated = self
            .listings
            .update_owned(&current.id(), &current.author(), &patch.normalized())
            .await
            .map_err(map_listing_error)?
            .ok_or_else(stay_not_found)?;

        info!(stay = %updated.id(), "stay updated");
        flashes.push(FlashNotice::success(format!(
            "Successfully updated {}.",
            updated.name()
        )));
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "listings_service_tests.rs"]
mod tests;
