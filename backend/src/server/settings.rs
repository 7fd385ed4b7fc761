//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `STAYS_*` environment variables, CLI flags, or a config
//! file. Everything is optional; the accessors supply defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use backend::domain::{ListingsSettings, SEARCH_LIMIT};
use ortho_config::OrthoConfig;
use pagination::PageSize;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Errors raised when settings hold unusable values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("page size must be at least 1")]
    PageSize,
    #[error("search limit must be between 1 and {SEARCH_LIMIT}, got {0}")]
    SearchLimit(u32),
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STAYS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one, listings live in memory.
    pub database_url: Option<String>,
    /// Listings per browse page.
    pub page_size: Option<u32>,
    /// Maximum search results, at most five.
    pub search_limit: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// `Strict`, `Lax`, or `None`.
    pub same_site: Option<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Paging and search limits for the listings service.
    pub fn listings(&self) -> Result<ListingsSettings, SettingsError> {
        let defaults = ListingsSettings::default();
        let page_size = match self.page_size {
            Some(size) => PageSize::new(size).map_err(|_| SettingsError::PageSize)?,
            None => defaults.page_size,
        };
        let search_limit = match self.search_limit {
            Some(limit) if (1..=SEARCH_LIMIT).contains(&limit) => limit,
            Some(limit) => return Err(SettingsError::SearchLimit(limit)),
            None => defaults.search_limit,
        };
        Ok(ListingsSettings {
            page_size,
            search_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "STAYS_BIND_ADDR",
        "STAYS_DATABASE_URL",
        "STAYS_PAGE_SIZE",
        "STAYS_SEARCH_LIMIT",
        "STAYS_SESSION_KEY_FILE",
        "STAYS_SESSION_ALLOW_EPHEMERAL",
        "STAYS_COOKIE_SECURE",
        "STAYS_SAME_SITE",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("stays")]).expect("settings should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse().expect("literal address")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.cookie_secure);
        assert!(!settings.session_allow_ephemeral);
        let listings = settings.listings().expect("default limits");
        assert_eq!(listings.page_size, PageSize::DEFAULT);
        assert_eq!(listings.search_limit, SEARCH_LIMIT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("STAYS_BIND_ADDR", "127.0.0.1:9000"),
            ("STAYS_PAGE_SIZE", "10"),
            ("STAYS_SEARCH_LIMIT", "3"),
            ("STAYS_COOKIE_SECURE", "false"),
        ]));
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse().expect("literal address")
        );
        assert!(!settings.cookie_secure);
        let listings = settings.listings().expect("limits");
        assert_eq!(listings.page_size.get(), 10);
        assert_eq!(listings.search_limit, 3);
    }

    #[rstest]
    #[case("STAYS_PAGE_SIZE")]
    #[case("STAYS_SEARCH_LIMIT")]
    fn zero_limits_are_rejected(#[case] var: &'static str) {
        let _guard = lock_env(env_with(&[(var, "0")]));
        assert!(load().listings().is_err());
    }

    #[rstest]
    #[case("6")]
    #[case("50")]
    fn search_limit_cannot_exceed_five(#[case] value: &str) {
        let _guard = lock_env(env_with(&[("STAYS_SEARCH_LIMIT", value)]));
        let err = load().listings().expect_err("limit above five");
        assert!(matches!(err, SettingsError::SearchLimit(_)));
        assert!(err.to_string().contains(value));
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(env_with(&[("STAYS_BIND_ADDR", "nowhere")]));
        let err = load().bind_addr().expect_err("bad address");
        assert!(err.to_string().contains("nowhere"));
    }
}
