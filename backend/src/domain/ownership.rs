//! Guard ensuring only a listing's author may change it.

use super::{Error, Listing, UserId};

/// Raised when someone other than the author tries to edit a listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("You must own the stay in order to edit it")]
pub struct OwnershipViolation {
    listing: super::ListingId,
    acting_user: UserId,
}

impl OwnershipViolation {
    pub fn listing(&self) -> super::ListingId {
        self.listing
    }

    pub fn acting_user(&self) -> UserId {
        self.acting_user
    }
}

impl From<OwnershipViolation> for Error {
    fn from(value: OwnershipViolation) -> Self {
        Error::forbidden(value.to_string())
    }
}

/// Fail unless `acting_user` authored `listing`.
pub fn assert_owner(listing: &Listing, acting_user: UserId) -> Result<(), OwnershipViolation> {
    if listing.author() == acting_user {
        Ok(())
    } else {
        Err(OwnershipViolation {
            listing: listing.id(),
            acting_user,
        })
    }
}
