//! Account and session handlers: sign-up, login, logout, the account page,
//! and draining flash notices.
//!
//! ```text
//! POST /api/v1/register {"email":"ana@example.com","name":"Ana","type":"host",
//!                        "password":"...","passwordConfirm":"..."}
//! POST /api/v1/login {"username":"host@example.com","password":"password"}
//! GET  /api/v1/logout
//! GET  /api/v1/account
//! POST /api/v1/account {"email":"ana@example.com","name":"Ana B"}
//! GET  /api/v1/flashes
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountUpdate, FieldError, FieldErrorCode, FlashBuffer, FlashNotice, FlashSink,
    LoginCredentials, LoginValidationError, RegistrationDraft, User, validation_failure,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body. `username` is the account e-mail.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn login_field_error(err: &LoginValidationError) -> FieldError {
    match err {
        LoginValidationError::EmptyEmail => {
            FieldError::required("username", "Please enter your email!")
        }
        LoginValidationError::InvalidEmail => {
            FieldError::new("username", FieldErrorCode::Invalid, "That Email is not valid!")
        }
        LoginValidationError::EmptyPassword => {
            FieldError::required("password", "Password cannot be blank!")
        }
    }
}

/// Authenticate and store the user id in the session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = match LoginCredentials::try_from(&*payload) {
        Ok(credentials) => credentials,
        Err(err) => return Err(validation_failure(&[login_field_error(&err)])),
    };
    let flashes = FlashBuffer::new();
    let outcome = state.login.authenticate(&credentials).await;
    match &outcome {
        Ok(user_id) => {
            session.persist_user(user_id)?;
            flashes.push(FlashNotice::success("You are now logged in!"));
        }
        Err(err) => flashes.push(FlashNotice::error(err.message())),
    }
    session.flush(&flashes)?;
    outcome?;
    Ok(HttpResponse::Ok().finish())
}

/// Create an account and sign it in.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegistrationDraft>,
) -> ApiResult<HttpResponse> {
    let flashes = FlashBuffer::new();
    let outcome = state
        .accounts_command
        .register(payload.into_inner(), &flashes)
        .await;
    if let Ok(user) = &outcome {
        session.persist_user(&user.id())?;
        flashes.push(FlashNotice::success("You are now logged in!"));
    }
    session.flush(&flashes)?;
    let user = outcome?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, "/api/v1/account"))
        .json(user))
}

/// The signed-in user's profile.
#[get("/account")]
pub async fn account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let ctx = session.request_context()?;
    Ok(web::Json(state.accounts.account(ctx).await?))
}

/// Edit the signed-in user's e-mail and name.
#[post("/account")]
pub async fn update_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AccountUpdate>,
) -> ApiResult<web::Json<User>> {
    let ctx = session.request_context()?;
    let flashes = FlashBuffer::new();
    let updated = state
        .accounts_command
        .update_account(ctx, payload.into_inner(), &flashes)
        .await;
    session.flush(&flashes)?;
    Ok(web::Json(updated?))
}

#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.forget_user();
    let flashes = FlashBuffer::new();
    flashes.push(FlashNotice::success("You are now logged out!"));
    session.flush(&flashes)?;
    Ok(HttpResponse::Ok().finish())
}

/// Remove and return queued notices.
#[get("/flashes")]
pub async fn take_flashes(session: SessionContext) -> ApiResult<web::Json<Vec<FlashNotice>>> {
    Ok(web::Json(session.take_flashes()?))
}
