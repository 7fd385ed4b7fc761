//! Driving port for reading the acting user's account.

use async_trait::async_trait;

use crate::domain::{Error, RequestContext, User};

#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// The acting user's profile. Requires a logged-in caller.
    async fn account(&self, ctx: RequestContext) -> Result<User, Error>;
}
