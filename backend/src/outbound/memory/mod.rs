//! In-memory document store backing the listing, review, and user ports.
//!
//! Used for local runs without a database and by the HTTP tests. All
//! collections sit behind one `tokio::sync::RwLock`; a lock guard never
//! outlives the call that took it, so each write is atomic with respect to
//! every other store operation.

mod text_index;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ListingRepository, ListingRepositoryError, ReviewRepository, ReviewRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Listing, ListingFilter, ListingId, ListingPatch, ListingQuery, ListingSort, PasswordDigest,
    Review, ScoredListing, TagCount, TopStay, User, UserId, fixture_users, rank_top_stays,
};

#[derive(Debug, Default)]
struct Documents {
    listings: Vec<Listing>,
    reviews: Vec<Review>,
    users: Vec<(User, PasswordDigest)>,
}

/// Shared in-memory store. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store holding only the development accounts.
    pub fn with_fixture_accounts() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Documents {
                users: fixture_users(),
                ..Documents::default()
            })),
        }
    }
}

fn newest_first(a: &Listing, b: &Listing) -> Ordering {
    b.created()
        .cmp(&a.created())
        .then_with(|| b.id().cmp(&a.id()))
}

fn select(listings: &[Listing], filter: &ListingFilter) -> Vec<ScoredListing> {
    match filter {
        ListingFilter::All => listings.iter().cloned().map(ScoredListing::unscored).collect(),
        ListingFilter::Tag(tag) => listings
            .iter()
            .filter(|listing| listing.has_tag(tag))
            .cloned()
            .map(ScoredListing::unscored)
            .collect(),
        ListingFilter::Text(text) => {
            let terms = text_index::tokenize(text);
            listings
                .iter()
                .filter_map(|listing| {
                    let score = text_index::score(listing, &terms);
                    (score > 0.0).then(|| ScoredListing {
                        listing: listing.clone(),
                        score: Some(score),
                    })
                })
                .collect()
        }
    }
}

fn order(rows: &mut [ScoredListing], sort: ListingSort) {
    match sort {
        ListingSort::CreatedDesc => rows.sort_by(|a, b| newest_first(&a.listing, &b.listing)),
        ListingSort::RelevanceDesc => rows.sort_by(|a, b| {
            let left = a.score.unwrap_or_default();
            let right = b.score.unwrap_or_default();
            right
                .total_cmp(&left)
                .then_with(|| newest_first(&a.listing, &b.listing))
        }),
    }
}

fn window(rows: Vec<ScoredListing>, skip: u64, limit: Option<u32>) -> Vec<ScoredListing> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let limit = limit.map_or(usize::MAX, |value| {
        usize::try_from(value).unwrap_or(usize::MAX)
    });
    rows.into_iter().skip(skip).take(limit).collect()
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn execute(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<ScoredListing>, ListingRepositoryError> {
        let documents = self.documents.read().await;
        let mut rows = select(&documents.listings, query.filter());
        order(&mut rows, query.sort());
        Ok(window(rows, query.skip(), query.limit()))
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingRepositoryError> {
        let documents = self.documents.read().await;
        let matched = select(&documents.listings, filter).len();
        u64::try_from(matched).map_err(|_| ListingRepositoryError::query("count overflow"))
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, ListingRepositoryError> {
        let documents = self.documents.read().await;
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for tag in documents.listings.iter().flat_map(Listing::tags) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(tag, count)| TagCount::new(tag, count))
            .collect())
    }

    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut documents = self.documents.write().await;
        if documents
            .listings
            .iter()
            .any(|existing| existing.slug() == listing.slug())
        {
            return Err(ListingRepositoryError::duplicate_slug(listing.slug()));
        }
        documents.listings.push(listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .listings
            .iter()
            .find(|listing| listing.id() == *id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .listings
            .iter()
            .find(|listing| listing.slug() == slug)
            .cloned())
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ListingRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .listings
            .iter()
            .map(Listing::slug)
            .filter(|slug| slug.starts_with(prefix))
            .map(str::to_owned)
            .collect())
    }

    async fn update_owned(
        &self,
        id: &ListingId,
        author: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .listings
            .iter_mut()
            .find(|listing| listing.id() == *id && listing.author() == *author)
            .map(|listing| {
                listing.apply(patch);
                listing.clone()
            }))
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        self.documents.write().await.reviews.push(review.clone());
        Ok(())
    }

    async fn list_for_listing(
        &self,
        listing: &ListingId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        let mut reviews: Vec<Review> = documents
            .reviews
            .iter()
            .filter(|review| review.stay() == *listing)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created().cmp(&a.created()));
        Ok(reviews)
    }

    async fn top_listings(
        &self,
        min_reviews: u64,
        limit: usize,
    ) -> Result<Vec<TopStay>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        let mut totals: HashMap<ListingId, (u64, u64)> = HashMap::new();
        for review in &documents.reviews {
            let entry = totals.entry(review.stay()).or_default();
            entry.0 += 1;
            entry.1 += u64::from(review.rating());
        }

        let ranked = documents
            .listings
            .iter()
            .filter_map(|listing| {
                let (count, sum) = totals.get(&listing.id()).copied()?;
                (count >= min_reviews && count > 0).then(|| TopStay {
                    stay: listing.clone(),
                    average_rating: sum as f64 / count as f64,
                    review_count: count,
                })
            })
            .collect();
        Ok(rank_top_stays(ranked, limit))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        if documents
            .users
            .iter()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Err(UserRepositoryError::duplicate_email(user.email()));
        }
        documents.users.push((user.clone(), password.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .users
            .iter()
            .find(|(user, _)| user.id() == *id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, PasswordDigest)>, UserRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .users
            .iter()
            .find(|(user, _)| user.email() == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut documents = self.documents.write().await;
        if documents
            .users
            .iter()
            .any(|(user, _)| user.email() == email && user.id() != *id)
        {
            return Err(UserRepositoryError::duplicate_email(email));
        }
        Ok(documents
            .users
            .iter_mut()
            .find(|(user, _)| user.id() == *id)
            .map(|(user, _)| {
                *user = user.clone().with_profile(email, name);
                user.clone()
            }))
    }
}
