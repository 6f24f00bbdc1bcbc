//! Outbound email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. When `SMTP_HOST` is
//! not set the mailer is disabled and messages are written to the log
//! instead, which keeps password reset usable in development.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use url::Url;

use crate::config::env_or;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "Flixhub <noreply@flixhub.local>";

/// SMTP connection settings.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" mailbox.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from_address", &self.from_address)
            .field("smtp_user", &self.smtp_user)
            .finish_non_exhaustive()
    }
}

impl EmailConfig {
    /// Load SMTP settings. Returns `None` if `SMTP_HOST` is unset.
    ///
    /// | Variable         | Required | Default                           |
    /// |------------------|----------|-----------------------------------|
    /// | `SMTP_HOST`      | yes      | --                                |
    /// | `SMTP_PORT`      | no       | `587`                             |
    /// | `SMTP_FROM`      | no       | `Flixhub <noreply@flixhub.local>` |
    /// | `SMTP_USER`      | no       | --                                |
    /// | `SMTP_PASSWORD`  | no       | --                                |
    ///
    /// # Panics
    ///
    /// Panics if `SMTP_PORT` is set but is not a valid port number.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: env_or("SMTP_PORT", DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends transactional email, or logs it when SMTP is not configured.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: Option<EmailConfig>,
}

impl Mailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send a plain-text message.
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let Some(config) = &self.config else {
            tracing::info!(to, subject, body = %body, "SMTP not configured, email logged only");
            return Ok(());
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport = transport.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport.build().send(email).await?;
        tracing::info!(to, subject, "Email sent");
        Ok(())
    }

    /// Email a password reset link.
    pub async fn send_password_reset(
        &self,
        to: &str,
        link: &Url,
        expiry_mins: i64,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Someone asked to reset the password for your Flixhub account.\n\n\
             Open this link to choose a new password:\n{link}\n\n\
             The link expires in {expiry_mins} minutes and works once. \
             If you did not ask for this, you can ignore this email."
        );
        self.send(to, "Reset your Flixhub password", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test that touches SMTP_* variables.
    #[test]
    fn from_env_reads_smtp_settings() {
        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
        assert!(EmailConfig::from_env().is_none());

        std::env::set_var("SMTP_HOST", "smtp.flixhub.test");
        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);

        std::env::set_var("SMTP_PORT", "2525");
        assert_eq!(EmailConfig::from_env().unwrap().smtp_port, 2525);

        std::env::set_var("SMTP_PORT", "twenty-five");
        assert!(std::panic::catch_unwind(EmailConfig::from_env).is_err());

        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
    }

    #[tokio::test]
    async fn disabled_mailer_logs_instead_of_sending() {
        let mailer = Mailer::new(None);
        assert!(!mailer.is_enabled());
        let link = Url::parse("http://localhost:5173/reset-password?token=abc").unwrap();
        assert!(mailer
            .send_password_reset("viewer@example.com", &link, 60)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn bad_recipient_is_address_error() {
        let mailer = Mailer::new(Some(EmailConfig {
            smtp_host: "smtp.invalid".into(),
            smtp_port: 587,
            from_address: DEFAULT_FROM_ADDRESS.into(),
            smtp_user: None,
            smtp_password: None,
        }));
        let err = mailer
            .send("not-an-email", "hi", "body".into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }
}
