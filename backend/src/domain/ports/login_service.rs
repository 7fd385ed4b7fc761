//! Driving port for authenticating a caller.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Authenticate credentials and return the account's user id.
///
/// Unknown e-mails and wrong passwords fail the same way so callers cannot
/// learn which addresses are registered.
#[async_trait]
pub trait LoginService: Send + Sync {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
