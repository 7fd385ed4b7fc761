//! Shared handler state.
//!
//! Handlers receive this through `web::Data` and only ever see driving
//! ports, so tests can swap in any implementation.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, ListingRepository, ListingsCommand, ListingsQuery,
    LoginService, ReviewRepository, ReviewsCommand, UserRepository,
};
use crate::domain::{AccountsService, ListingsService, ListingsSettings, ReviewsService};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountsQuery>,
    pub accounts_command: Arc<dyn AccountsCommand>,
    pub listings: Arc<dyn ListingsQuery>,
    pub listings_command: Arc<dyn ListingsCommand>,
    pub reviews: Arc<dyn ReviewsCommand>,
}

impl HttpState {
    /// Wire every service over one set of repositories.
    pub fn from_repositories<L, R, U>(
        listings: Arc<L>,
        reviews: Arc<R>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        settings: ListingsSettings,
    ) -> Self
    where
        L: ListingRepository + 'static,
        R: ReviewRepository + 'static,
        U: UserRepository + 'static,
    {
        let accounts = Arc::new(AccountsService::new(users));
        let stays = Arc::new(ListingsService::new(
            listings.clone(),
            reviews.clone(),
            clock.clone(),
            settings,
        ));
        Self {
            login: accounts.clone(),
            accounts: accounts.clone(),
            accounts_command: accounts,
            listings: stays.clone(),
            listings_command: stays,
            reviews: Arc::new(ReviewsService::new(listings, reviews, clock)),
        }
    }
}
