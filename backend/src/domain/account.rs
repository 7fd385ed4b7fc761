//! Registration and profile edits for user accounts.
//!
//! Accounts are keyed by e-mail address, which is normalised (trimmed and
//! lower-cased) before it is validated, stored, or compared.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{FieldError, FieldErrorCode};
use super::{PasswordDigest, User, UserId};

/// Password shared by the development accounts.
pub const FIXTURE_PASSWORD: &str = "password";

/// Development accounts as `(email, user id)`.
pub const FIXTURE_ACCOUNTS: [(&str, Uuid); 2] = [
    (
        "host@example.com",
        Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000),
    ),
    (
        "guest@example.com",
        Uuid::from_u128(0x3fa85f64_5717_4562_b3fc_2c963f66afa6),
    ),
];

/// The development accounts with their password digests.
pub fn fixture_users() -> Vec<(User, PasswordDigest)> {
    let [(host_email, host_id), (guest_email, guest_id)] = FIXTURE_ACCOUNTS;
    vec![
        (
            User::new(UserId::from_uuid(host_id), host_email, "Fixture Host", "host"),
            PasswordDigest::derive(FIXTURE_PASSWORD),
        ),
        (
            User::new(UserId::from_uuid(guest_id), guest_email, "Fixture Guest", "guest"),
            PasswordDigest::derive(FIXTURE_PASSWORD),
        ),
    ]
}

/// Trim and lower-case an e-mail address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a normalised address looks like `local@domain.tld`.
///
/// ```
/// use backend::domain::is_email;
///
/// assert!(is_email("host@example.com"));
/// assert!(!is_email("host@localhost"));
/// assert!(!is_email("two@at@example.com"));
/// ```
pub fn is_email(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, _)| !head.is_empty())
        && !domain.ends_with('.')
}

const EMAIL_REQUIRED: &str = "Please provide an email address";
const EMAIL_INVALID: &str = "Invalid Email Address";
const NAME_REQUIRED: &str = "Please provide a name";
const TYPE_REQUIRED: &str = "Please provide a type";
const PASSWORD_REQUIRED: &str = "Password cannot be blank!";
const CONFIRM_REQUIRED: &str = "Confirmed Password cannot be blank!";
const CONFIRM_MISMATCH: &str = "Oops! Your passwords do not match";

/// Raw sign-up form.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub password: String,
    pub password_confirm: String,
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("account_type", &self.account_type)
            .finish_non_exhaustive()
    }
}

impl RegistrationDraft {
    /// The account described by a draft that passed
    /// [`validate_registration`].
    pub fn to_user(&self, id: UserId) -> User {
        User::new(
            id,
            normalize_email(&self.email),
            self.name.trim(),
            self.account_type.trim(),
        )
    }
}

/// Raw profile edit. Both fields are required, as on the sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountUpdate {
    pub email: String,
    pub name: String,
}

impl AccountUpdate {
    /// Copy with the e-mail normalised and the name trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            email: normalize_email(&self.email),
            name: self.name.trim().to_owned(),
        }
    }
}

fn check_email(raw: &str, errors: &mut Vec<FieldError>) {
    let email = normalize_email(raw);
    if email.is_empty() {
        errors.push(FieldError::required("email", EMAIL_REQUIRED));
    } else if !is_email(&email) {
        errors.push(FieldError::new("email", FieldErrorCode::Invalid, EMAIL_INVALID));
    }
}

fn require(field: &str, value: &str, message: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field, message));
    }
}

/// Field errors for a sign-up form; empty when the draft is acceptable.
///
/// Passwords are compared verbatim; only emptiness is checked beyond the
/// confirmation match.
pub fn validate_registration(draft: &RegistrationDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(&draft.email, &mut errors);
    require("name", &draft.name, NAME_REQUIRED, &mut errors);
    require("type", &draft.account_type, TYPE_REQUIRED, &mut errors);
    if draft.password.is_empty() {
        errors.push(FieldError::required("password", PASSWORD_REQUIRED));
    }
    if draft.password_confirm.is_empty() {
        errors.push(FieldError::required("passwordConfirm", CONFIRM_REQUIRED));
    } else if draft.password_confirm != draft.password {
        errors.push(FieldError::new(
            "passwordConfirm",
            FieldErrorCode::Invalid,
            CONFIRM_MISMATCH,
        ));
    }
    errors
}

/// Field errors for a profile edit.
pub fn validate_account_update(update: &AccountUpdate) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(&update.email, &mut errors);
    require("name", &update.name, NAME_REQUIRED, &mut errors);
    errors
}
