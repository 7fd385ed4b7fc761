//! HTTP inbound adapter exposing the stays API.
//!
//! Handlers translate requests into calls on the driving ports held in
//! [`state::HttpState`], read identity from the cookie session, and write any
//! flash notices raised by the domain back to it.

pub mod error;
pub mod health;
pub mod listings;
pub mod reviews;
pub mod session;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::{ApiResult, not_found};

/// Mount every API handler. Callers wrap this in the `/api/v1` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::account)
        .service(users::update_account)
        .service(users::take_flashes)
        .service(listings::list_stays)
        .service(listings::list_stays_page)
        .service(listings::edit_form)
        .service(listings::search)
        .service(listings::stay_by_slug)
        .service(listings::top_stays)
        .service(listings::add_form)
        .service(listings::create_stay)
        .service(listings::update_stay)
        .service(tags::list_tags)
        .service(tags::stays_for_tag)
        .service(reviews::add_review);
}
