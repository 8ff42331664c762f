// Email builders - each builder knows how to construct its specific
// email type from the registered templates

use super::types::{
    CheckinNotificationData, CheckoutNotificationData, EmailBuilder, EmailError, EmailMessage,
    VerificationEmailData,
};
use crate::app_config::EmailConfig;
use handlebars::Handlebars;

fn from_line(config: &EmailConfig) -> String {
    format!("{} <{}>", config.from_name, config.from_email)
}

/// Builder for company-registration verification emails
pub struct VerificationEmailBuilder<'a> {
    to_email: &'a str,
    user_name: &'a str,
    company_name: &'a str,
    verification_link: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> VerificationEmailBuilder<'a> {
    pub fn new(
        to_email: &'a str,
        user_name: &'a str,
        company_name: &'a str,
        verification_link: &'a str,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            user_name,
            company_name,
            verification_link,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for VerificationEmailBuilder<'a> {
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = VerificationEmailData {
            user_name: self.user_name.to_string(),
            company_name: self.company_name.to_string(),
            verification_link: self.verification_link.to_string(),
            app_name: self.config.from_name.clone(),
            support_email: self.config.support_email.clone(),
            expiry_hours: self.config.verification_token_ttl / 3600,
        };

        let html = self
            .templates
            .render("verify_email", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Hello {},\n\n\
            Thank you for registering \"{}\". Verify your email to access \
            your admin dashboard:\n\n{}\n\n\
            This link expires in {} hours. If you didn't create this \
            account, please ignore this email.\n\n\
            Best regards,\n\
            The {} Team",
            self.user_name,
            self.company_name,
            self.verification_link,
            data.expiry_hours,
            self.config.from_name
        );

        Ok(EmailMessage::new(
            from_line(self.config),
            vec![self.to_email.to_string()],
            format!("Verify Your Email - {}", self.config.from_name),
            html,
        )
        .with_text(text))
    }
}

/// Builder for the host notification sent after a visitor checks in
pub struct CheckinNotificationBuilder<'a> {
    to_email: &'a str,
    host_name: &'a str,
    visitor_name: &'a str,
    visitor_company: &'a str,
    purpose: &'a str,
    check_in_time: String,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> CheckinNotificationBuilder<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        to_email: &'a str,
        host_name: &'a str,
        visitor_name: &'a str,
        visitor_company: &'a str,
        purpose: &'a str,
        check_in_time: String,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            host_name,
            visitor_name,
            visitor_company,
            purpose,
            check_in_time,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for CheckinNotificationBuilder<'a> {
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = CheckinNotificationData {
            host_name: self.host_name.to_string(),
            visitor_name: self.visitor_name.to_string(),
            visitor_company: self.visitor_company.to_string(),
            purpose: self.purpose.to_string(),
            check_in_time: self.check_in_time.clone(),
            app_name: self.config.from_name.clone(),
        };

        let html = self
            .templates
            .render("checkin_notification", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Dear {},\n\n\
            You have a new visitor:\n\
            Name: {}\n\
            Company: {}\n\
            Purpose: {}\n\
            Check-in Time: {}\n\n\
            Best regards,\n{}",
            self.host_name,
            self.visitor_name,
            self.visitor_company,
            self.purpose,
            self.check_in_time,
            self.config.from_name
        );

        Ok(EmailMessage::new(
            from_line(self.config),
            vec![self.to_email.to_string()],
            format!("New Visitor Check-in: {}", self.visitor_name),
            html,
        )
        .with_text(text))
    }
}

/// Builder for the host notification sent after a visitor checks out
pub struct CheckoutNotificationBuilder<'a> {
    to_email: &'a str,
    host_name: &'a str,
    visitor_name: &'a str,
    check_out_time: String,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> CheckoutNotificationBuilder<'a> {
    pub fn new(
        to_email: &'a str,
        host_name: &'a str,
        visitor_name: &'a str,
        check_out_time: String,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            host_name,
            visitor_name,
            check_out_time,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for CheckoutNotificationBuilder<'a> {
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = CheckoutNotificationData {
            host_name: self.host_name.to_string(),
            visitor_name: self.visitor_name.to_string(),
            check_out_time: self.check_out_time.clone(),
            app_name: self.config.from_name.clone(),
        };

        let html = self
            .templates
            .render("checkout_notification", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Dear {},\n\n\
            Visitor {} has checked out at {}.\n\n\
            Best regards,\n{}",
            self.host_name, self.visitor_name, self.check_out_time, self.config.from_name
        );

        Ok(EmailMessage::new(
            from_line(self.config),
            vec![self.to_email.to_string()],
            "Visitor Check-out Notification".to_string(),
            html,
        )
        .with_text(text))
    }
}
