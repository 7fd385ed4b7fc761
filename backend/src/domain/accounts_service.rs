//! Account service implementing login, sign-up, and profile edits.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::listings_service::reject_fields;
use crate::domain::ports::{
    AccountsCommand, AccountsQuery, LoginService, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccountUpdate, Error, FlashNotice, FlashSink, LoginCredentials, PasswordDigest,
    RegistrationDraft, RequestContext, User, UserId, validate_account_update,
    validate_registration,
};

const FAILED_LOGIN: &str = "Failed Login!";

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("An account for {email} already exists!"))
        }
    }
}

/// Map a store failure, queueing a notice when the e-mail is taken.
fn reject_store_error(error: UserRepositoryError, flashes: &dyn FlashSink) -> Error {
    let duplicate = matches!(error, UserRepositoryError::DuplicateEmail { .. });
    let error = map_user_error(error);
    if duplicate {
        flashes.push(FlashNotice::error(error.message()));
    }
    error
}

fn account_not_found() -> Error {
    Error::not_found("account not found")
}

/// Service implementing [`LoginService`], [`AccountsQuery`], and
/// [`AccountsCommand`] over one [`UserRepository`].
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
}

impl<U> AccountsService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LoginService for AccountsService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let found = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?;
        match found {
            Some((user, digest)) if digest.verify(credentials.password()) => Ok(user.id()),
            _ => {
                debug!("login rejected");
                Err(Error::unauthorized(FAILED_LOGIN))
            }
        }
    }
}

#[async_trait]
impl<U> AccountsQuery for AccountsService<U>
where
    U: UserRepository,
{
    async fn account(&self, ctx: RequestContext) -> Result<User, Error> {
        let id = ctx.require_user()?;
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(account_not_found)
    }
}

#[async_trait]
impl<U> AccountsCommand for AccountsService<U>
where
    U: UserRepository,
{
    async fn register(
        &self,
        draft: RegistrationDraft,
        flashes: &dyn FlashSink,
    ) -> Result<User, Error> {
        let errors = validate_registration(&draft);
        if !errors.is_empty() {
            return Err(reject_fields(&errors, flashes));
        }

        let user = draft.to_user(UserId::random());
        let digest = PasswordDigest::derive(&draft.password);
        self.users
            .insert(&user, &digest)
            .await
            .map_err(|error| reject_store_error(error, flashes))?;

        info!(user = %user.id(), "account registered");
        Ok(user)
    }

    async fn update_account(
        &self,
        ctx: RequestContext,
        update: AccountUpdate,
        flashes: &dyn FlashSink,
    ) -> Result<User, Error> {
        let id = ctx.require_user()?;
        let errors = validate_account_update(&update);
        if !errors.is_empty() {
            return Err(reject_fields(&errors, flashes));
        }

        let update = update.normalized();
        let user = self
            .users
            .update_profile(&id, &update.email, &update.name)
            .await
            .map_err(|error| reject_store_error(error, flashes))?
            .ok_or_else(account_not_found)?;

        info!(user = %id, "account updated");
        flashes.push(FlashNotice::success("Updated the profile!"));
        Ok(user)
    }
}
