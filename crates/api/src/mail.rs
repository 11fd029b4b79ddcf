//! Outgoing mail for password reset codes.
//!
//! SMTP is optional. When `SMTP_HOST` is unset [`EmailConfig::from_env`]
//! returns `None`, no [`Mailer`] is built, and the reset handler only logs
//! that a code was issued.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::auth::reset_code::RESET_CODE_TTL_MINS;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@fleetcheck.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// | Variable        | Required | Default                     |
    /// |-----------------|----------|-----------------------------|
    /// | `SMTP_HOST`     | yes      | --                          |
    /// | `SMTP_PORT`     | no       | `587`                       |
    /// | `SMTP_FROM`     | no       | `noreply@fleetcheck.local`  |
    /// | `SMTP_USER`     | no       | --                          |
    /// | `SMTP_PASSWORD` | no       | --                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// STARTTLS SMTP sender. The transport is pooled, so build one per process.
pub struct Mailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            from_address: config.from_address.clone(),
            transport: builder.build(),
        })
    }

    pub async fn send_reset_code(&self, to_email: &str, code: &str) -> Result<(), MailError> {
        let message = reset_code_message(&self.from_address, to_email, code)?;
        self.transport.send(message).await?;
        tracing::info!(to = to_email, "Password reset code sent");
        Ok(())
    }
}

/// Plain-text reset email.
pub fn reset_code_message(from: &str, to: &str, code: &str) -> Result<Message, MailError> {
    let body = format!(
        "Your Fleetcheck password reset code is {code}.\n\n\
         It expires in {RESET_CODE_TTL_MINS} minutes. If you did not ask to reset \
         your password you can ignore this email."
    );
    Message::builder()
        .from(from.parse()?)
        .to(to.parse()?)
        .subject("Fleetcheck password reset code")
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reset_message_carries_code() {
        let msg = reset_code_message("noreply@fleetcheck.local", "ops@depot.example", "042917")
            .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("042917"));
        assert!(raw.contains("Subject: Fleetcheck password reset code"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let err = reset_code_message("noreply@fleetcheck.local", "not-an-email", "000000")
            .unwrap_err();
        assert_matches!(err, MailError::Address(_));
    }

    #[test]
    fn build_error_display() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
