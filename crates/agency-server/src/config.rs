//! Server Configuration
//!
//! Read once at startup and passed into state; components never read the
//! environment themselves.

use agency_core::{AgencyError, ServiceSettings};
use agency_payments::DEFAULT_RENEWAL_DAYS;

/// Process-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// Public base URL (callbacks, invitation links)
    pub app_url: String,
    /// Apex domain agency subdomains are created under
    pub main_domain: String,
    /// Sender address for invitations
    pub mail_from: String,
    /// Days a completed payment keeps a subscription active
    pub renewal_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            app_url: "http://localhost:3000".into(),
            main_domain: "localhost".into(),
            mail_from: "no-reply@localhost".into(),
            renewal_days: DEFAULT_RENEWAL_DAYS,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, AgencyError> {
        let defaults = Self::default();
        let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());

        let main_domain = var("MAIN_DOMAIN", &defaults.main_domain);
        let renewal_days = match std::env::var("SUBSCRIPTION_RENEWAL_DAYS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| AgencyError::Config(format!("SUBSCRIPTION_RENEWAL_DAYS is not a number: {raw}")))?,
            Err(_) => defaults.renewal_days,
        };

        let config = Self {
            bind_addr: var("BIND_ADDR", &defaults.bind_addr),
            app_url: var("APP_URL", &defaults.app_url),
            mail_from: var("SMTP_FROM", &format!("no-reply@{main_domain}")),
            main_domain,
            renewal_days,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AgencyError> {
        if self.renewal_days <= 0 {
            return Err(AgencyError::Config("SUBSCRIPTION_RENEWAL_DAYS must be positive".into()));
        }
        if !self.app_url.starts_with("http://") && !self.app_url.starts_with("https://") {
            return Err(AgencyError::Config(format!("APP_URL must be an http(s) URL: {}", self.app_url)));
        }
        Ok(())
    }

    pub fn renewal_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.renewal_days)
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            app_url: self.app_url.clone(),
            mail_from: self.mail_from.clone(),
        }
    }
}
