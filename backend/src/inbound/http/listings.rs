//! Listing handlers: browsing, search, lookup, and the add/edit flow.
//!
//! ```text
//! GET  /api/v1/stays
//! GET  /api/v1/stays/page/{page}
//! GET  /api/v1/search?q=beach
//! GET  /api/v1/stay/{slug}
//! GET  /api/v1/add
//! POST /api/v1/add {"name":"Beach House","description":"...","location":"..."}
//! GET  /api/v1/stays/{id}/edit
//! POST /api/v1/add/{id} {"name":"Beach House 2"}
//! GET  /api/v1/top
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use pagination::{Page, PageNumber};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{BrowseOutcome, ListingForm, SearchResponse, StayDetail};
use crate::domain::{Error, FlashBuffer, Listing, ListingDraft, ListingId, ListingPatch, TopStay};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const API_PREFIX: &str = "/api/v1";

/// One page of listings as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct StaysPage {
    pub stays: Vec<Listing>,
    pub page: u32,
    pub pages: u64,
    pub count: u64,
}

impl From<Page<Listing>> for StaysPage {
    fn from(page: Page<Listing>) -> Self {
        let (number, pages, count) = (page.page().get(), page.pages(), page.count());
        Self {
            stays: page.into_items(),
            page: number,
            pages,
            count,
        }
    }
}

/// Query string for `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Listing ids arrive as path text; anything unparsable names no listing.
pub(crate) fn parse_listing_id(raw: &str) -> Result<ListingId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found("stay not found"))
}

fn page_location(page: PageNumber) -> String {
    format!("{API_PREFIX}/stays/page/{page}")
}

async fn browse_page(
    state: &HttpState,
    session: &SessionContext,
    raw_page: Option<&str>,
) -> ApiResult<HttpResponse> {
    let flashes = FlashBuffer::new();
    let outcome = state.listings.browse(raw_page, &flashes).await;
    session.flush(&flashes)?;
    match outcome? {
        BrowseOutcome::Page(page) => Ok(HttpResponse::Ok().json(StaysPage::from(page))),
        BrowseOutcome::Redirect(target) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, page_location(target)))
            .finish()),
    }
}

/// First page of listings, newest first.
#[get("/stays")]
pub async fn list_stays(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    browse_page(&state, &session, None).await
}

/// A numbered page of listings. Overflowing pages redirect to the last one.
#[get("/stays/page/{page}")]
pub async fn list_stays_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    browse_page(&state, &session, Some(path.as_str())).await
}

#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResponse>> {
    let response = state.listings.search(params.q.as_deref()).await?;
    Ok(web::Json(response))
}

/// A listing and its reviews.
#[get("/stay/{slug}")]
pub async fn stay_by_slug(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StayDetail>> {
    let detail = state.listings.stay_by_slug(path.as_str()).await?;
    Ok(web::Json(detail))
}

#[get("/top")]
pub async fn top_stays(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TopStay>>> {
    Ok(web::Json(state.listings.top_stays().await?))
}

#[get("/add")]
pub async fn add_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListingForm>> {
    let ctx = session.request_context()?;
    Ok(web::Json(state.listings.add_form(ctx).await?))
}

/// Create a listing owned by the signed-in user.
#[post("/add")]
pub async fn create_stay(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ListingDraft>,
) -> ApiResult<HttpResponse> {
    let ctx = session.request_context()?;
    let flashes = FlashBuffer::new();
    let created = state
        .listings_command
        .create(ctx, payload.into_inner(), &flashes)
        .await;
    session.flush(&flashes)?;
    let stay = created?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("{API_PREFIX}/stay/{}", stay.slug())))
        .json(stay))
}

#[get("/stays/{id}/edit")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingForm>> {
    let ctx = session.request_context()?;
    let id = parse_listing_id(path.as_str())?;
    Ok(web::Json(state.listings.edit_form(ctx, id).await?))
}

/// Apply an edit. Only the author may edit.
#[post("/add/{id}")]
pub async fn update_stay(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ListingPatch>,
) -> ApiResult<web::Json<Listing>> {
    let ctx = session.request_context()?;
    let id = parse_listing_id(path.as_str())?;
    let flashes = FlashBuffer::new();
    let updated = state
        .listings_command
        .update(ctx, id, payload.into_inner(), &flashes)
        .await;
    session.flush(&flashes)?;
    Ok(web::Json(updated?))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
