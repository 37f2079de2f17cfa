//! Outbound Email
//!
//! Delivery is behind the [`Mailer`] trait. The bundled implementations log
//! or record messages; an SMTP transport plugs in the same way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::agency::Agency;
use crate::error::Result;
use crate::model::Invitation;

/// A rendered email
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    /// Invitation for an affiliate to register on the agency's subdomain
    pub fn invitation(from: &str, app_url: &str, agency: &Agency, invitation: &Invitation) -> Self {
        let link = invitation_link(app_url, &agency.subdomain, invitation);
        Self {
            from: from.to_string(),
            to: invitation.email.clone(),
            subject: format!("Invitation to join {}", agency.name),
            html: format!(
                "<p>You've been invited to join {name} as an affiliate.</p>\n\
                 <p>Click the link below to register:</p>\n\
                 <a href=\"{link}\">{link}</a>",
                name = agency.name,
            ),
        }
    }
}

/// Registration link carried by an invitation email
pub fn invitation_link(app_url: &str, subdomain: &str, invitation: &Invitation) -> String {
    format!(
        "{}/{}/register?invitation={}",
        app_url.trim_end_matches('/'),
        subdomain,
        invitation.id
    )
}

/// Email delivery port
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Writes messages to the log instead of delivering them
#[derive(Clone, Debug, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Email queued (logging mailer)"
        );
        Ok(())
    }
}

/// Keeps every sent message in memory
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agency::Branding;
    use crate::id::UserId;

    #[test]
    fn test_invitation_email() {
        let agency = Agency::new("Coastal Homes", "coastal", Branding::default());
        let invitation = Invitation::new(agency.id.clone(), UserId::new(), "new@agent.com");

        let message = EmailMessage::invitation(
            "no-reply@agencyhub.co.za",
            "https://agencyhub.co.za/",
            &agency,
            &invitation,
        );

        let link = format!(
            "https://agencyhub.co.za/coastal/register?invitation={}",
            invitation.id
        );
        assert_eq!(message.to, "new@agent.com");
        assert_eq!(message.subject, "Invitation to join Coastal Homes");
        assert!(message.html.contains(&link));
    }
}
