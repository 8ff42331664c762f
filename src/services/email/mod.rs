// Email service module
// Orchestrates builders and the provider sender. All workflow callers
// treat sends as best-effort: a failed notification never fails the
// request that triggered it.

pub mod builders;
pub mod sender;
pub mod types;

use self::types::EmailBuilder;
use crate::app_config::{EmailConfig, EmailProvider};
use anyhow::Result;
use builders::{CheckinNotificationBuilder, CheckoutNotificationBuilder, VerificationEmailBuilder};
use handlebars::Handlebars;
use sender::EmailSender;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Email service for sending various types of emails
#[derive(Clone)]
pub struct EmailService {
    sender: EmailSender,
    config: EmailConfig,
    templates: Arc<Handlebars<'static>>,
}

impl EmailService {
    /// Create a new email service instance
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mut templates = Handlebars::new();
        Self::register_templates(&mut templates)?;

        let sender = EmailSender::new(config.api_url.clone(), config.api_key.clone())
            .with_max_retries(3)
            .with_retry_delay(std::time::Duration::from_secs(1));

        Ok(Self {
            sender,
            config,
            templates: Arc::new(templates),
        })
    }

    /// Register all email templates
    fn register_templates(templates: &mut Handlebars) -> Result<(), types::EmailError> {
        let verify_template = include_str!("../../../templates/email/verify_email.html");
        templates
            .register_template_string("verify_email", verify_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        let checkin_template = include_str!("../../../templates/email/checkin_notification.html");
        templates
            .register_template_string("checkin_notification", checkin_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        let checkout_template = include_str!("../../../templates/email/checkout_notification.html");
        templates
            .register_template_string("checkout_notification", checkout_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.config.provider == EmailProvider::Disabled || self.config.api_key.is_empty()
    }

    /// Send the company-registration verification email
    #[instrument(skip(self))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        user_name: &str,
        company_name: &str,
        verification_link: &str,
    ) -> Result<(), types::EmailError> {
        if self.is_disabled() {
            warn!("Email provider disabled, skipping verification email");
            return Ok(());
        }
        info!("Sending verification email to {}", to_email);

        let builder = VerificationEmailBuilder::new(
            to_email,
            user_name,
            company_name,
            verification_link,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        self.sender.send_with_retry(message).await
    }

    /// Notify a host that a visitor has checked in
    #[instrument(skip(self))]
    pub async fn send_checkin_notification(
        &self,
        to_email: &str,
        host_name: &str,
        visitor_name: &str,
        visitor_company: &str,
        purpose: &str,
        check_in_time: String,
    ) -> Result<(), types::EmailError> {
        if self.is_disabled() {
            return Ok(());
        }
        info!("Sending check-in notification to {}", to_email);

        let builder = CheckinNotificationBuilder::new(
            to_email,
            host_name,
            visitor_name,
            visitor_company,
            purpose,
            check_in_time,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        // Notifications are fire-once; the visit is already committed
        self.sender.send(message).await
    }

    /// Notify a host that a visitor has checked out
    #[instrument(skip(self))]
    pub async fn send_checkout_notification(
        &self,
        to_email: &str,
        host_name: &str,
        visitor_name: &str,
        check_out_time: String,
    ) -> Result<(), types::EmailError> {
        if self.is_disabled() {
            return Ok(());
        }
        info!("Sending checkout notification to {}", to_email);

        let builder = CheckoutNotificationBuilder::new(
            to_email,
            host_name,
            visitor_name,
            check_out_time,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        self.sender.send(message).await
    }
}

// Re-export commonly used types for convenience
pub use types::{EmailError, EmailMessage};

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> EmailConfig {
        EmailConfig {
            provider: EmailProvider::Resend,
            api_key: "test_key".to_string(),
            api_url: "https://api.resend.com/emails".to_string(),
            from_email: "noreply@vms.test".to_string(),
            from_name: "Test VMS".to_string(),
            support_email: "support@vms.test".to_string(),
            frontend_url: "https://app.vms.test".to_string(),
            verification_token_ttl: 86400,
        }
    }

    #[test]
    fn test_email_service_creation() {
        let config = create_test_config();
        let service = EmailService::new(config);
        assert!(service.is_ok());
    }

    #[test]
    fn test_verification_email_renders_link() {
        let config = create_test_config();
        let service = EmailService::new(config.clone()).unwrap();

        let builder = VerificationEmailBuilder::new(
            "ada@acme.test",
            "Ada Admin",
            "Acme",
            "https://app.vms.test/api/verify-email?token=abc123",
            &config,
            &service.templates,
        );
        let message = builder.build().expect("build");

        assert!(message.html.contains("abc123"));
        assert!(message.html.contains("Acme"));
        assert!(message.subject.contains("Verify"));
        assert_eq!(message.to, vec!["ada@acme.test".to_string()]);
    }

    #[test]
    fn test_disabled_provider_skips_send() {
        let mut config = create_test_config();
        config.provider = EmailProvider::Disabled;
        let service = EmailService::new(config).unwrap();
        assert!(service.is_disabled());
    }
}
