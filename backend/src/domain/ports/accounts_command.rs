//! Driving port for signing up and editing an account.

use async_trait::async_trait;

use crate::domain::{AccountUpdate, Error, FlashSink, RegistrationDraft, RequestContext, User};

#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Validate and store a new account.
    ///
    /// Validation failures push one `error` notice per field. An e-mail that
    /// is already registered yields a `conflict` error.
    async fn register(
        &self,
        draft: RegistrationDraft,
        flashes: &dyn FlashSink,
    ) -> Result<User, Error>;

    /// Validate and apply a profile edit for the acting user.
    async fn update_account(
        &self,
        ctx: RequestContext,
        update: AccountUpdate,
        flashes: &dyn FlashSink,
    ) -> Result<User, Error>;
}
