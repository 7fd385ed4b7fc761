//! Per-request context handed explicitly to every domain operation.

use super::UserId;

/// Identity of the caller for a single request.
///
/// Built by the inbound adapter from the session and passed by value into
/// services; the domain never reads identity from ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    acting_user: Option<UserId>,
}

impl RequestContext {
    /// Context for an unauthenticated caller.
    pub const fn anonymous() -> Self {
        Self { acting_user: None }
    }

    /// Context for an authenticated caller.
    pub const fn for_user(user: UserId) -> Self {
        Self {
            acting_user: Some(user),
        }
    }

    /// The authenticated user, if any.
    pub fn acting_user(&self) -> Option<UserId> {
        self.acting_user
    }

    /// The authenticated user or an `unauthorized` error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ErrorCode, RequestContext};
    ///
    /// let err = RequestContext::anonymous().require_user().expect_err("anonymous");
    /// assert_eq!(err.code(), ErrorCode::Unauthorized);
    /// ```
    pub fn require_user(&self) -> Result<UserId, super::Error> {
        self.acting_user
            .ok_or_else(|| super::Error::unauthorized("You must be logged in to do that!"))
    }
}

impl From<Option<UserId>> for RequestContext {
    fn from(acting_user: Option<UserId>) -> Self {
        Self { acting_user }
    }
}
