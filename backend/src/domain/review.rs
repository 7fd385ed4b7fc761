//! Reviews left on listings and the derived top-stays ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{FieldError, FieldErrorCode};
use super::{Listing, ListingId, UserId};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: ReviewId,
    author: UserId,
    stay: ListingId,
    text: String,
    rating: u8,
    created: DateTime<Utc>,
}

impl Review {
    /// Build a review from a draft that passed [`validate_review_draft`].
    ///
    /// Returns `None` when the rating is missing or out of range.
    pub fn from_draft(
        id: ReviewId,
        author: UserId,
        stay: ListingId,
        draft: &ReviewDraft,
        created: DateTime<Utc>,
    ) -> Option<Self> {
        let rating = checked_rating(draft.rating?)?;
        Some(Self {
            id,
            author,
            stay,
            text: draft.text.trim().to_owned(),
            rating,
            created,
        })
    }

    /// Rehydrate a review loaded from storage.
    pub fn from_parts(
        id: ReviewId,
        author: UserId,
        stay: ListingId,
        text: String,
        rating: u8,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            stay,
            text,
            rating,
            created,
        }
    }

    pub fn id(&self) -> ReviewId {
        self.id
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn stay(&self) -> ListingId {
        self.stay
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Raw review form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDraft {
    pub text: String,
    pub rating: Option<i64>,
}

/// Field errors for a review form; empty when acceptable.
pub fn validate_review_draft(draft: &ReviewDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.text.trim().is_empty() {
        errors.push(FieldError::required("text", "Your review must have text!"));
    }
    match draft.rating {
        None => errors.push(FieldError::required("rating", "Please pick a rating!")),
        Some(value) if checked_rating(value).is_none() => errors.push(FieldError::new(
            "rating",
            FieldErrorCode::OutOfRange,
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
        )),
        Some(_) => {}
    }
    errors
}

fn checked_rating(value: i64) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
}

/// A listing ranked by its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopStay {
    pub stay: Listing,
    pub average_rating: f64,
    pub review_count: u64,
}

/// Order by average descending then name ascending, keeping at most `limit`.
pub fn rank_top_stays(mut stays: Vec<TopStay>, limit: usize) -> Vec<TopStay> {
    stays.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then_with(|| a.stay.name().cmp(b.stay.name()))
    });
    stays.truncate(limit);
    stays
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), true)]
    #[case(Some(5), true)]
    #[case(Some(0), false)]
    #[case(Some(6), false)]
    #[case(Some(-3), false)]
    #[case(None, false)]
    fn rating_bounds(#[case] rating: Option<i64>, #[case] valid: bool) {
        let draft = ReviewDraft {
            text: "Lovely".into(),
            rating,
        };
        let errors = validate_review_draft(&draft);
        assert_eq!(errors.is_empty(), valid);
        if !valid {
            assert_eq!(errors[0].field(), "rating");
        }
    }

    #[rstest]
    fn out_of_range_uses_dedicated_code() {
        let errors = validate_review_draft(&ReviewDraft {
            text: "ok".into(),
            rating: Some(9),
        });
        assert_eq!(errors[0].code(), FieldErrorCode::OutOfRange);
    }

    #[rstest]
    fn blank_text_is_required() {
        let errors = validate_review_draft(&ReviewDraft {
            text: "  ".into(),
            rating: Some(3),
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "text");
    }
}
