//! PostgreSQL-backed [`ReviewRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{ListingId, Review, TopStay};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_failure_message};
use super::models::{NewReviewRow, ReviewRow, TopStayRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

const TOP_STAYS_SQL: &str = r"
SELECT s.id, s.name, s.slug, s.author, s.description, s.tags, s.location, s.photo, s.created,
       AVG(r.rating)::float8 AS average_rating,
       COUNT(r.id) AS review_count
FROM stays s
JOIN reviews r ON r.stay = s.id
GROUP BY s.id
HAVING COUNT(r.id) >= $1
ORDER BY average_rating DESC, s.name ASC
LIMIT $2
";

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    ReviewRepositoryError::connection(pool_failure_message(error))
}

fn map_diesel_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> ReviewRepositoryError {
    move |error| match classify_diesel_error(error, operation) {
        StoreFailure::Connection(message) => ReviewRepositoryError::connection(message),
        StoreFailure::UniqueViolation => {
            ReviewRepositoryError::query(format!("{operation}: unique constraint violated"))
        }
        StoreFailure::Query(message) => ReviewRepositoryError::query(message),
    }
}

/// Diesel adapter for review storage.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reviews::table)
            .values(NewReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("review insert"))
    }

    async fn list_for_listing(
        &self,
        listing: &ListingId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::stay.eq(listing.as_uuid()))
            .order((reviews::created.desc(), reviews::id.desc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("review listing"))?;
        rows.into_iter()
            .map(Review::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ReviewRepositoryError::query)
    }

    async fn top_listings(
        &self,
        min_reviews: u64,
        limit: usize,
    ) -> Result<Vec<TopStay>, ReviewRepositoryError> {
        let min_reviews = i64::try_from(min_reviews).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TopStayRow> = sql_query(TOP_STAYS_SQL)
            .bind::<BigInt, _>(min_reviews)
            .bind::<BigInt, _>(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("top stays"))?;
        Ok(rows.into_iter().map(TopStay::from).collect())
    }
}
