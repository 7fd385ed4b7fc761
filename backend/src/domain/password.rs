//! Salted password digests stored alongside user records.
//!
//! Stored as `salt$hash`, both hex. Passwords themselves never leave the
//! request that carried them.

use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SEPARATOR: char = '$';

/// Returned when a stored digest cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored password digest is malformed")]
pub struct MalformedDigest;

/// Salt plus SHA-256 of `salt || password`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: String,
    hash: String,
}

impl PasswordDigest {
    /// Digest `password` under a fresh random salt.
    // TODO: move to argon2 once a memory-hard KDF crate joins the stack.
    pub fn derive(password: &str) -> Self {
        let salt = hex::encode(Uuid::new_v4().as_bytes());
        let hash = hash(&salt, password);
        Self { salt, hash }
    }

    /// Whether `password` produces this digest.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = hash(&self.salt, password);
        constant_time_eq(candidate.as_bytes(), self.hash.as_bytes())
    }

    /// Encode for storage.
    pub fn encode(&self) -> String {
        format!("{}{SEPARATOR}{}", self.salt, self.hash)
    }

    /// Decode a value produced by [`PasswordDigest::encode`].
    ///
    /// ```
    /// use backend::domain::PasswordDigest;
    ///
    /// let digest = PasswordDigest::derive("secret");
    /// let stored = PasswordDigest::parse(&digest.encode()).expect("round trip");
    /// assert!(stored.verify("secret"));
    /// assert!(PasswordDigest::parse("no-separator").is_err());
    /// ```
    pub fn parse(encoded: &str) -> Result<Self, MalformedDigest> {
        let (salt, hash) = encoded.split_once(SEPARATOR).ok_or(MalformedDigest)?;
        let is_hex = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex(salt) || !is_hex(hash) {
            return Err(MalformedDigest);
        }
        Ok(Self {
            salt: salt.to_owned(),
            hash: hash.to_owned(),
        })
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

fn hash(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
