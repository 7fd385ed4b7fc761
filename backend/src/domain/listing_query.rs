//! Immutable description of a listing read executed by the store in one call.

use super::Listing;

/// Which listings a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFilter {
    /// Every listing.
    All,
    /// Listings carrying this exact tag.
    Tag(String),
    /// Listings matching this free-text query.
    Text(String),
}

impl ListingFilter {
    /// Tag filter when `tag` is present, otherwise no filter.
    pub fn for_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => Self::Tag(tag.to_owned()),
            None => Self::All,
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSort {
    /// Newest first, ties broken by id.
    #[default]
    CreatedDesc,
    /// Highest relevance first, ties broken by newest.
    RelevanceDesc,
}

/// A filter, ordering, and window over the listing collection.
///
/// # Examples
/// ```
/// use backend::domain::{ListingFilter, ListingQuery, ListingSort};
///
/// let query = ListingQuery::new(ListingFilter::All).with_window(12, Some(6));
/// assert_eq!(query.sort(), ListingSort::CreatedDesc);
/// assert_eq!(query.skip(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    filter: ListingFilter,
    sort: ListingSort,
    skip: u64,
    limit: Option<u32>,
}

impl ListingQuery {
    /// Unbounded query newest first.
    pub fn new(filter: ListingFilter) -> Self {
        Self {
            filter,
            sort: ListingSort::default(),
            skip: 0,
            limit: None,
        }
    }

    /// Ranked text search capped at `limit` results.
    pub fn text_search(text: impl Into<String>, limit: u32) -> Self {
        Self::new(ListingFilter::Text(text.into()))
            .sorted_by(ListingSort::RelevanceDesc)
            .with_window(0, Some(limit))
    }

    #[must_use]
    pub fn sorted_by(self, sort: ListingSort) -> Self {
        Self { sort, ..self }
    }

    #[must_use]
    pub fn with_window(self, skip: u64, limit: Option<u32>) -> Self {
        Self {
            skip,
            limit,
            ..self
        }
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    pub fn sort(&self) -> ListingSort {
        self.sort
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

/// A listing plus its relevance score when the query ranked results.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredListing {
    pub listing: Listing,
    pub score: Option<f32>,
}

impl ScoredListing {
    pub fn unscored(listing: Listing) -> Self {
        Self {
            listing,
            score: None,
        }
    }
}

impl From<ScoredListing> for Listing {
    fn from(value: ScoredListing) -> Self {
        value.listing
    }
}
