use std::str::FromStr;

use url::Url;

use crate::auth::jwt::JwtConfig;
use crate::mailer::EmailConfig;
use crate::storage::StorageConfig;

/// Default lifetime of an emailed password reset link.
const DEFAULT_RESET_EXPIRY_MINS: i64 = 60;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Base URL of the web client; reset links point here.
    pub frontend_url: Url,
    /// Lifetime of password reset tokens in minutes.
    pub password_reset_expiry_mins: i64,
    /// Uploaded media location and limits.
    pub storage: StorageConfig,
    /// SMTP settings; `None` disables mail delivery.
    pub email: Option<EmailConfig>,
    /// Administrator account ensured at startup, if configured.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the administrator created on first boot.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BootstrapAdmin {
    /// Read `ADMIN_EMAIL`, `ADMIN_USERNAME` and `ADMIN_PASSWORD`.
    ///
    /// Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            email: std::env::var("ADMIN_EMAIL").ok()?,
            username: std::env::var("ADMIN_USERNAME").ok()?,
            password: std::env::var("ADMIN_PASSWORD").ok()?,
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `FRONTEND_URL`               | `http://localhost:5173`    |
    /// | `PASSWORD_RESET_EXPIRY_MINS` | `60`                       |
    ///
    /// JWT, storage and SMTP settings are read by [`JwtConfig::from_env`],
    /// [`StorageConfig::from_env`] and [`EmailConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let frontend_url: Url = env_or("FRONTEND_URL", "http://localhost:5173");
        assert!(
            !frontend_url.cannot_be_a_base(),
            "FRONTEND_URL must be an absolute http(s) URL"
        );

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            frontend_url,
            password_reset_expiry_mins: env_or(
                "PASSWORD_RESET_EXPIRY_MINS",
                DEFAULT_RESET_EXPIRY_MINS,
            ),
            storage: StorageConfig::from_env(),
            email: EmailConfig::from_env(),
            bootstrap_admin: BootstrapAdmin::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
pub(crate) fn env_or<T, D>(key: &str, default: D) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: ToString,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} has invalid value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_uses_default_when_unset() {
        let port: u16 = env_or("FLIXHUB_TEST_UNSET_PORT", 8080);
        assert_eq!(port, 8080);
    }

    #[test]
    #[should_panic(expected = "FLIXHUB_TEST_BAD_PORT has invalid value")]
    fn env_or_panics_on_garbage() {
        std::env::set_var("FLIXHUB_TEST_BAD_PORT", "eighty");
        let _: u16 = env_or("FLIXHUB_TEST_BAD_PORT", 80);
    }

    #[test]
    fn bootstrap_admin_debug_hides_password() {
        let admin = BootstrapAdmin {
            email: "root@flixhub.test".into(),
            username: "root".into(),
            password: "hunter22".into(),
        };
        let rendered = format!("{admin:?}");
        assert!(!rendered.contains("hunter22"));
    }
}
