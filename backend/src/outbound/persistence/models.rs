//! Diesel row structs for the stays, reviews, and users tables. Never exposed
//! to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Float4};
use uuid::Uuid;

use crate::domain::{
    Listing, ListingId, ListingPatch, PasswordDigest, Review, ReviewId, TopStay, User, UserId,
};

use super::schema::{reviews, stays, users};

/// Row read from `stays`.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = stays)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StayRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub author: Uuid,
    pub description: String,
    pub tags: Vec<String>,
    pub location: String,
    pub photo: Option<String>,
    pub created: DateTime<Utc>,
}

impl From<StayRow> for Listing {
    fn from(row: StayRow) -> Self {
        Listing::from_parts(
            ListingId::from_uuid(row.id),
            row.name,
            row.slug,
            UserId::from_uuid(row.author),
            row.description,
            row.tags,
            row.location,
            row.photo,
            row.created,
        )
    }
}

/// Stay row plus the `ts_rank` projected by a text search.
#[derive(Debug, QueryableByName)]
pub(crate) struct RankedStayRow {
    #[diesel(embed)]
    pub stay: StayRow,
    #[diesel(sql_type = Float4)]
    pub score: f32,
}

/// Stay row plus review aggregates.
#[derive(Debug, QueryableByName)]
pub(crate) struct TopStayRow {
    #[diesel(embed)]
    pub stay: StayRow,
    #[diesel(sql_type = Double)]
    pub average_rating: f64,
    #[diesel(sql_type = BigInt)]
    pub review_count: i64,
}

impl From<TopStayRow> for TopStay {
    fn from(row: TopStayRow) -> Self {
        TopStay {
            stay: row.stay.into(),
            average_rating: row.average_rating,
            review_count: u64::try_from(row.review_count).unwrap_or_default(),
        }
    }
}

/// `SELECT COUNT(*) AS count` result.
#[derive(Debug, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// One row of the tag histogram.
#[derive(Debug, QueryableByName)]
pub(crate) struct TagCountRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub tag: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Insertable listing.
#[derive(Debug, Insertable)]
#[diesel(table_name = stays)]
pub(crate) struct NewStayRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub slug: &'a str,
    pub author: Uuid,
    pub description: &'a str,
    pub tags: Vec<String>,
    pub tag_text: String,
    pub location: &'a str,
    pub photo: Option<&'a str>,
    pub created: DateTime<Utc>,
}

impl<'a> From<&'a Listing> for NewStayRow<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            id: *listing.id().as_uuid(),
            name: listing.name(),
            slug: listing.slug(),
            author: *listing.author().as_uuid(),
            description: listing.description(),
            tags: listing.tags().to_vec(),
            tag_text: listing.tags().join(" "),
            location: listing.location(),
            photo: listing.photo(),
            created: listing.created(),
        }
    }
}

/// Partial update built from a normalised [`ListingPatch`].
///
/// `None` leaves a column untouched; `photo: Some(None)` clears it.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = stays)]
pub(crate) struct StayChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_text: Option<String>,
    pub location: Option<String>,
    pub photo: Option<Option<String>>,
}

impl StayChangeset {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.location.is_none()
            && self.photo.is_none()
    }
}

impl From<&ListingPatch> for StayChangeset {
    fn from(patch: &ListingPatch) -> Self {
        Self {
            name: patch.name.clone(),
            description: patch.description.clone(),
            tag_text: patch.tags.as_ref().map(|tags| tags.join(" ")),
            tags: patch.tags.clone(),
            location: patch.location.clone(),
            photo: patch.photo.as_deref().map(|photo| {
                let photo = photo.trim();
                (!photo.is_empty()).then(|| photo.to_owned())
            }),
        }
    }
}

/// Row read from `reviews`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub author: Uuid,
    pub stay: Uuid,
    pub text: String,
    pub rating: i16,
    pub created: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = String;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating)
            .map_err(|_| format!("review {} has invalid rating {}", row.id, row.rating))?;
        Ok(Review::from_parts(
            ReviewId::from_uuid(row.id),
            UserId::from_uuid(row.author),
            ListingId::from_uuid(row.stay),
            row.text,
            rating,
            row.created,
        ))
    }
}

/// Insertable review.
#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub author: Uuid,
    pub stay: Uuid,
    pub text: &'a str,
    pub rating: i16,
    pub created: DateTime<Utc>,
}

impl<'a> From<&'a Review> for NewReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            id: *review.id().as_uuid(),
            author: *review.author().as_uuid(),
            stay: *review.stay().as_uuid(),
            text: review.text(),
            rating: i16::from(review.rating()),
            created: review.created(),
        }
    }
}

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub account_type: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::from_uuid(row.id), row.email, row.name, row.account_type)
    }
}

/// Account row plus its stored password digest.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_digest: String,
}

impl CredentialRow {
    /// Split into the domain user and decoded digest.
    pub fn into_credentials(self) -> Result<(User, PasswordDigest), String> {
        let digest = PasswordDigest::parse(&self.password_digest)
            .map_err(|err| format!("user {}: {err}", self.user.id))?;
        Ok((self.user.into(), digest))
    }
}

/// Insertable account.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub account_type: &'a str,
    pub password_digest: String,
}

impl<'a> NewUserRow<'a> {
    pub fn new(user: &'a User, password: &PasswordDigest) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email(),
            name: user.name(),
            account_type: user.account_type(),
            password_digest: password.encode(),
        }
    }
}
