//! PostgreSQL-backed [`ListingRepository`].
//!
//! Filtered and windowed reads use the Diesel query builder. Text search and
//! the tag histogram need `tsvector` and `unnest`, so they go through
//! `sql_query` with bound parameters.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{
    Listing, ListingFilter, ListingId, ListingPatch, ListingQuery, ListingSort, ScoredListing,
    TagCount, UserId,
};

use super::diesel_error_mapping::{
    StoreFailure, classify_diesel_error, count_from_db, pool_failure_message,
};
use super::models::{CountRow, NewStayRow, RankedStayRow, StayChangeset, StayRow, TagCountRow};
use super::pool::{DbPool, PoolError};
use super::schema::stays;

const STAY_COLUMNS: &str =
    "id, name, slug, author, description, tags, location, photo, created";

const TAG_COUNTS_SQL: &str = r"
SELECT tag, COUNT(*) AS count
FROM stays, unnest(tags) AS tag
GROUP BY tag
";

const TEXT_COUNT_SQL: &str = r"
SELECT COUNT(*) AS count
FROM stays
WHERE search_document @@ plainto_tsquery('english', $1)
";

fn text_search_sql(sort: ListingSort) -> String {
    let order = match sort {
        ListingSort::RelevanceDesc => "score DESC, created DESC, id DESC",
        ListingSort::CreatedDesc => "created DESC, id DESC",
    };
    format!(
        "SELECT {STAY_COLUMNS}, \
         ts_rank(search_document, plainto_tsquery('english', $1)) AS score \
         FROM stays \
         WHERE search_document @@ plainto_tsquery('english', $1) \
         ORDER BY {order} \
         OFFSET $2 LIMIT $3"
    )
}

fn map_pool_error(error: PoolError) -> ListingRepositoryError {
    ListingRepositoryError::connection(pool_failure_message(error))
}

fn map_diesel_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> ListingRepositoryError {
    move |error| match classify_diesel_error(error, operation) {
        StoreFailure::Connection(message) => ListingRepositoryError::connection(message),
        StoreFailure::UniqueViolation => {
            ListingRepositoryError::query(format!("{operation}: unique constraint violated"))
        }
        StoreFailure::Query(message) => ListingRepositoryError::query(message),
    }
}

fn to_db_offset(skip: u64) -> i64 {
    i64::try_from(skip).unwrap_or(i64::MAX)
}

/// Diesel adapter for listing storage.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn search(
        &self,
        text: &str,
        query: &ListingQuery,
    ) -> Result<Vec<ScoredListing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RankedStayRow> = sql_query(text_search_sql(query.sort()))
            .bind::<Text, _>(text)
            .bind::<BigInt, _>(to_db_offset(query.skip()))
            .bind::<Nullable<BigInt>, _>(query.limit().map(i64::from))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("listing text search"))?;
        Ok(rows
            .into_iter()
            .map(|row| ScoredListing {
                listing: row.stay.into(),
                score: Some(row.score),
            })
            .collect())
    }
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn execute(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<ScoredListing>, ListingRepositoryError> {
        let tag = match query.filter() {
            ListingFilter::Text(text) => return self.search(text, query).await,
            ListingFilter::Tag(tag) => Some(tag.clone()),
            ListingFilter::All => None,
        };

        let mut statement = stays::table
            .select(StayRow::as_select())
            .order((stays::created.desc(), stays::id.desc()))
            .offset(to_db_offset(query.skip()))
            .into_boxed();
        if let Some(tag) = tag {
            statement = statement.filter(stays::tags.contains(vec![tag]));
        }
        if let Some(limit) = query.limit() {
            statement = statement.limit(i64::from(limit));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StayRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("listing query"))?;
        Ok(rows
            .into_iter()
            .map(|row| ScoredListing::unscored(row.into()))
            .collect())
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = match filter {
            ListingFilter::All => stays::table.count().get_result::<i64>(&mut conn).await,
            ListingFilter::Tag(tag) => {
                stays::table
                    .filter(stays::tags.contains(vec![tag.clone()]))
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
            }
            ListingFilter::Text(text) => sql_query(TEXT_COUNT_SQL)
                .bind::<Text, _>(text)
                .get_result::<CountRow>(&mut conn)
                .await
                .map(|row| row.count),
        }
        .map_err(map_diesel_error("listing count"))?;
        Ok(count_from_db(count))
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagCountRow> = sql_query(TAG_COUNTS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("tag counts"))?;
        Ok(rows
            .into_iter()
            .map(|row| TagCount::new(row.tag, count_from_db(row.count)))
            .collect())
    }

    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(stays::table)
            .values(NewStayRow::from(listing))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match classify_diesel_error(error, "listing insert") {
                StoreFailure::UniqueViolation => {
                    ListingRepositoryError::duplicate_slug(listing.slug())
                }
                StoreFailure::Connection(message) => ListingRepositoryError::connection(message),
                StoreFailure::Query(message) => ListingRepositoryError::query(message),
            })
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StayRow> = stays::table
            .filter(stays::id.eq(id.as_uuid()))
            .select(StayRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("listing lookup by id"))?;
        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StayRow> = stays::table
            .filter(stays::slug.eq(slug))
            .select(StayRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error("listing lookup by slug"))?;
        Ok(row.map(Into::into))
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        stays::table
            .filter(stays::slug.like(format!("{prefix}%")))
            .select(stays::slug)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("slug prefix lookup"))
    }

    async fn update_owned(
        &self,
        id: &ListingId,
        author: &UserId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let changeset = StayChangeset::from(patch);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned = stays::table
            .filter(stays::id.eq(id.as_uuid()))
            .filter(stays::author.eq(author.as_uuid()));

        let row: Option<StayRow> = if changeset.is_empty() {
            owned
                .select(StayRow::as_select())
                .first(&mut conn)
                .await
                .optional()
        } else {
            diesel::update(owned)
                .set(&changeset)
                .returning(StayRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
        }
        .map_err(map_diesel_error("listing update"))?;
        Ok(row.map(Into::into))
    }
}
