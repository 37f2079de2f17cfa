//! PayFast Configuration

use crate::error::{PaymentError, Result};

const SANDBOX_PROCESS_URL: &str = "https://sandbox.payfast.co.za/eng/process";
const LIVE_PROCESS_URL: &str = "https://www.payfast.co.za/eng/process";

/// Merchant credentials and callback URLs
#[derive(Clone, Debug)]
pub struct PayFastConfig {
    pub merchant_id: String,
    pub merchant_key: String,
    /// Shared secret appended to the canonical string before hashing
    pub passphrase: String,
    /// Use the sandbox process URL
    pub sandbox: bool,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
}

impl PayFastConfig {
    /// Build with callback URLs derived from the public application URL
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
        passphrase: impl Into<String>,
        app_url: &str,
    ) -> Self {
        let base = app_url.trim_end_matches('/');
        Self {
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
            passphrase: passphrase.into(),
            sandbox: true,
            return_url: format!("{base}/dashboard/subscription/success"),
            cancel_url: format!("{base}/dashboard/subscription/cancel"),
            notify_url: format!("{base}/api/subscription/notify"),
        }
    }

    /// Create from environment variables
    pub fn from_env(app_url: &str) -> Result<Self> {
        let var = |name: &'static str| {
            std::env::var(name).map_err(|_| PaymentError::Config(format!("{name} not set")))
        };

        let mut config = Self::new(
            var("PAYFAST_MERCHANT_ID")?,
            var("PAYFAST_MERCHANT_KEY")?,
            var("PAYFAST_PASSPHRASE")?,
            app_url,
        );
        config.sandbox = std::env::var("PAYFAST_SANDBOX")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        config.validate()?;
        Ok(config)
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<()> {
        if self.merchant_id.trim().is_empty() || self.merchant_key.trim().is_empty() {
            return Err(PaymentError::Config("PayFast merchant credentials are empty".into()));
        }
        if self.passphrase.is_empty() {
            return Err(PaymentError::Config("PAYFAST_PASSPHRASE is empty".into()));
        }
        Ok(())
    }

    /// Hosted payment page
    pub fn process_url(&self) -> &'static str {
        if self.sandbox { SANDBOX_PROCESS_URL } else { LIVE_PROCESS_URL }
    }
}
