//! Domain primitives, aggregates, and services for the stays backend.
//!
//! Public surface:
//! - [`Listing`], [`Review`], [`TagCount`], [`TopStay`]: stored and derived
//!   records.
//! - [`ListingQuery`]: immutable read specification executed by a store in
//!   one call.
//! - [`RequestContext`] and [`FlashSink`]: per-request identity and notice
//!   collection, always passed explicitly.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`User`], [`RegistrationDraft`], [`AccountUpdate`]: accounts and the
//!   forms that create and edit them.
//! - [`ListingsService`] / [`ReviewsService`] / [`AccountsService`]: driving
//!   port implementations.

pub mod account;
pub mod accounts_service;
pub mod auth;
pub mod context;
pub mod error;
pub mod flash;
pub mod listing;
pub mod listing_query;
pub mod listings_service;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod review;
pub mod reviews_service;
pub mod slug;
pub mod tags;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account::{
    AccountUpdate, FIXTURE_ACCOUNTS, FIXTURE_PASSWORD, RegistrationDraft, fixture_users, is_email,
    normalize_email, validate_account_update, validate_registration,
};
pub use self::accounts_service::AccountsService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::context::RequestContext;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::flash::{FlashBuffer, FlashKind, FlashNotice, FlashSink};
pub use self::listing::{
    Listing, ListingDraft, ListingId, ListingIdentity, ListingPatch, normalize_tags,
    validate_listing_draft, validate_listing_patch,
};
pub use self::listing_query::{ListingFilter, ListingQuery, ListingSort, ScoredListing};
pub use self::listings_service::{
    ListingsService, ListingsSettings, SEARCH_LIMIT, TOP_STAYS_LIMIT, TOP_STAYS_MIN_REVIEWS,
};
pub use self::ownership::{OwnershipViolation, assert_owner};
pub use self::password::{MalformedDigest, PasswordDigest};
pub use self::review::{
    MAX_RATING, MIN_RATING, Review, ReviewDraft, ReviewId, TopStay, rank_top_stays,
    validate_review_draft,
};
pub use self::reviews_service::ReviewsService;
pub use self::slug::{is_slug_variant, next_available_slug, slugify};
pub use self::tags::{TagCount, sort_tag_counts};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError};
pub use self::validation::{FieldError, FieldErrorCode, validation_failure};

/// Result alias used by handlers and services.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
