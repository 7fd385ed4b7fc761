//! Driving port for listing reads: browsing, search, tags, and lookups.

use async_trait::async_trait;
use pagination::{Page, PageNumber};
use serde::Serialize;

use crate::domain::{
    Error, FlashSink, Listing, ListingId, RequestContext, Review, TagCount, TopStay,
};

/// Outcome of browsing one page of listings.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome {
    /// The requested page.
    Page(Page<Listing>),
    /// The requested page lies past the end; go here instead.
    Redirect(PageNumber),
}

/// Ranked text-search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub stays: Vec<Listing>,
    pub length: usize,
}

/// Tag counts plus the listings selected by an optional tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<TagCount>,
    pub stays: Vec<Listing>,
    pub tag: Option<String>,
}

/// One listing with its reviews, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayDetail {
    pub stay: Listing,
    pub reviews: Vec<Review>,
}

/// Form state handed to the add/edit screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingForm {
    pub title: String,
    pub stay: Option<Listing>,
}

#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// Page through listings newest first.
    ///
    /// `raw_page` is the unparsed page segment; unusable values fall back to
    /// the first page. An overflowing page pushes one `info` notice and
    /// yields [`BrowseOutcome::Redirect`].
    async fn browse(
        &self,
        raw_page: Option<&str>,
        flashes: &dyn FlashSink,
    ) -> Result<BrowseOutcome, Error>;

    /// Ranked search over listing text. Blank queries are rejected.
    async fn search(&self, query: Option<&str>) -> Result<SearchResponse, Error>;

    /// Tag counts and the listings carrying `tag` (all listings when absent).
    async fn tags(&self, tag: Option<&str>) -> Result<TagsResponse, Error>;

    async fn stay_by_slug(&self, slug: &str) -> Result<StayDetail, Error>;

    /// Best-reviewed listings.
    async fn top_stays(&self) -> Result<Vec<TopStay>, Error>;

    /// Empty form for a new listing. Login required.
    async fn add_form(&self, ctx: RequestContext) -> Result<ListingForm, Error>;

    /// Pre-filled form for an existing listing. Login and ownership required.
    async fn edit_form(&self, ctx: RequestContext, id: ListingId) -> Result<ListingForm, Error>;
}
