//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`ListingsQuery`, `ListingsCommand`, `ReviewsCommand`,
//! `AccountsQuery`, `AccountsCommand`, `LoginService`) are called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod accounts_query;
mod listing_repository;
mod listings_command;
mod listings_query;
mod login_service;
mod review_repository;
mod reviews_command;
mod user_repository;

pub use accounts_command::AccountsCommand;
pub use accounts_query::AccountsQuery;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingRepository, ListingRepositoryError};
pub use listings_command::ListingsCommand;
pub use listings_query::{
    BrowseOutcome, ListingForm, ListingsQuery, SearchResponse, StayDetail, TagsResponse,
};
pub use login_service::LoginService;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
pub use reviews_command::ReviewsCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
