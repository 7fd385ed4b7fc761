//! Tag handlers.
//!
//! ```text
//! GET /api/v1/tags
//! GET /api/v1/tags/{tag}
//! ```

use actix_web::{get, web};

use crate::domain::ports::TagsResponse;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Every tag with its count, plus all listings.
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<TagsResponse>> {
    Ok(web::Json(state.listings.tags(None).await?))
}

/// Every tag with its count, plus the listings carrying `tag`.
#[get("/tags/{tag}")]
pub async fn stays_for_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagsResponse>> {
    Ok(web::Json(state.listings.tags(Some(path.as_str())).await?))
}
