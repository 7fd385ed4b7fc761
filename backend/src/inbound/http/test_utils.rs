//! Helpers shared by the HTTP handler tests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use crate::domain::ListingsSettings;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Session middleware with a throwaway key and a non-secure `session`
/// cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Handler state over `store` with default listing settings.
pub fn memory_state(store: &MemoryStore) -> HttpState {
    let store = Arc::new(store.clone());
    HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store,
        Arc::new(DefaultClock),
        ListingsSettings::default(),
    )
}
