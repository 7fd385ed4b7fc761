//! Driven port for account storage.

use async_trait::async_trait;

use crate::domain::{PasswordDigest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "user store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// Another account already uses the e-mail address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Port for reading and writing accounts.
///
/// E-mail arguments are expected in normalised form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account with its password digest.
    async fn insert(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// The account registered under `email` and its password digest.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, PasswordDigest)>, UserRepositoryError>;

    /// Replace the e-mail and name of account `id`.
    ///
    /// Returns `None` when no such account exists.
    async fn update_profile(
        &self,
        id: &UserId,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, UserRepositoryError>;
}
