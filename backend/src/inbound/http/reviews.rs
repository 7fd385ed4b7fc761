//! Review handlers.
//!
//! ```text
//! POST /api/v1/reviews/{id} {"text":"Lovely","rating":5}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::{FlashBuffer, ReviewDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listings::parse_listing_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Leave a review on the listing identified by `id`.
#[post("/reviews/{id}")]
pub async fn add_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewDraft>,
) -> ApiResult<HttpResponse> {
    let ctx = session.request_context()?;
    let listing = parse_listing_id(path.as_str())?;
    let flashes = FlashBuffer::new();
    let saved = state
        .reviews
        .add_review(ctx, listing, payload.into_inner(), &flashes)
        .await;
    session.flush(&flashes)?;
    Ok(HttpResponse::Created().json(saved?))
}
