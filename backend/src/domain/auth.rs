//! Login credentials handed to the authentication collaborator.
//!
//! Accounts are keyed by e-mail address. The core never inspects passwords;
//! it only normalises the address and refuses blank inputs before the
//! [`LoginService`](crate::domain::ports::LoginService) port is consulted.

use zeroize::Zeroizing;

use super::account::{is_email, normalize_email};

/// Returned when login payload values are unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// E-mail was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// E-mail was not of the form `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased, and of the form `local@domain.tld`.
/// - `password` is non-empty and kept verbatim, zeroised on drop.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Host@Example.com ", "pw").expect("valid");
/// assert_eq!(creds.email(), "host@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = normalize_email(email);
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if !is_email(&normalized) {
            return Err(LoginValidationError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised e-mail address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("host", "pw", LoginValidationError::InvalidEmail)]
    #[case("@example.com", "pw", LoginValidationError::InvalidEmail)]
    #[case("host@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("a@b.c", " secret ").expect("valid");
        assert_eq!(creds.password(), " secret ");
    }
}
