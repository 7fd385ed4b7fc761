//! PostgreSQL-backed [`UserRepository`].
//!
//! The unique index on `users.email` is the source of truth for duplicate
//! addresses; both insert and profile update map its violation to
//! [`UserRepositoryError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{PasswordDigest, User, UserId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_failure_message};
use super::models::{CredentialRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_failure_message(error))
}

/// Map a Diesel failure, treating a unique violation as `email` being taken.
fn map_write_error(
    operation: &'static str,
    email: &str,
) -> impl Fn(diesel::result::Error) -> UserRepositoryError {
    let email = email.to_owned();
    move |error| match classify_diesel_error(error, operation) {
        StoreFailure::UniqueViolation => UserRepositoryError::duplicate_email(email.as_str()),
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn map_read_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> UserRepositoryError {
    move |error| match classify_diesel_error(error, operation) {
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::UniqueViolation => {
            UserRepositoryError::query(format!("{operation}: unique constraint violated"))
        }
        StoreFailure::Query(message) => UserRepositoryError::query(message),
    }
}

/// Diesel adapter for account storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::new(user, password))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_error("user insert", user.email()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error("user lookup by id"))?;
        Ok(row.map(Into::into))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, PasswordDigest)>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialRow> = users::table
            .filter(users::email.eq(email))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error("credential lookup"))?;
        row.map(CredentialRow::into_credentials)
            .transpose()
            .map_err(UserRepositoryError::query)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set((users::email.eq(email), users::name.eq(name)))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_write_error("user update", email))?;
        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            UserRepositoryError::connection("timed out")
        );
    }

    #[rstest]
    fn write_mapper_keeps_query_failures() {
        let mapper = map_write_error("user insert", "ana@example.com");
        assert_eq!(
            mapper(diesel::result::Error::NotFound),
            UserRepositoryError::query("user insert: record not found")
        );
    }

    #[rstest]
    fn read_mapper_reports_operation() {
        let mapper = map_read_error("credential lookup");
        assert_eq!(
            mapper(diesel::result::Error::RollbackTransaction),
            UserRepositoryError::query("credential lookup: database error")
        );
    }
}
