// Email service types - shared types and structures for the email module

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during email operations
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Template rendering error: {0}")]
    TemplateError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable")]
    ServiceUnavailable,
}

/// Generic email message structure that can be sent
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

impl EmailMessage {
    pub fn new(from: String, to: Vec<String>, subject: String, html: String) -> Self {
        Self {
            from,
            to,
            subject,
            html,
            text: None,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }
}

/// Trait that all email builders must implement
pub trait EmailBuilder {
    /// Build the email message
    fn build(&self) -> Result<EmailMessage, EmailError>;
}

/// Data structure for the verification email template
#[derive(Serialize)]
pub struct VerificationEmailData {
    pub user_name: String,
    pub company_name: String,
    pub verification_link: String,
    pub app_name: String,
    pub support_email: String,
    pub expiry_hours: u64,
}

/// Data structure for the host check-in notification template
#[derive(Serialize)]
pub struct CheckinNotificationData {
    pub host_name: String,
    pub visitor_name: String,
    pub visitor_company: String,
    pub purpose: String,
    pub check_in_time: String,
    pub app_name: String,
}

/// Data structure for the checkout notification template
#[derive(Serialize)]
pub struct CheckoutNotificationData {
    pub host_name: String,
    pub visitor_name: String,
    pub check_out_time: String,
    pub app_name: String,
}

/// Provider-API specific email payload. Optional fields are omitted from
/// the JSON when they are None.
#[derive(Debug, Serialize)]
pub struct ProviderEmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<EmailMessage> for ProviderEmailPayload {
    fn from(message: EmailMessage) -> Self {
        Self {
            from: message.from,
            to: message.to,
            subject: message.subject,
            html: message.html,
            text: message.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_omits_absent_text() {
        let message = EmailMessage::new(
            "VMS <noreply@vms.test>".to_string(),
            vec!["host@acme.test".to_string()],
            "subject".to_string(),
            "<p>hi</p>".to_string(),
        );
        let payload: ProviderEmailPayload = message.into();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_payload_keeps_text_when_present() {
        let message = EmailMessage::new(
            "VMS <noreply@vms.test>".to_string(),
            vec!["host@acme.test".to_string()],
            "subject".to_string(),
            "<p>hi</p>".to_string(),
        )
        .with_text("hi".to_string());
        let payload: ProviderEmailPayload = message.into();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["text"], "hi");
    }
}
