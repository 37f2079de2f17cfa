//! Subdomain Provisioning
//!
//! Registering an agency points `{subdomain}.{main_domain}` at the
//! deployment. The GoDaddy client patches an `A` record through the GoDaddy
//! REST API; the logging provisioner is used when no DNS credentials are set.

use async_trait::async_trait;
use serde::Serialize;

use crate::agency::Agency;
use crate::error::{AgencyError, Result};

const GODADDY_API_URL: &str = "https://api.godaddy.com/v1";
const RECORD_TTL_SECS: u32 = 600;

/// Provisioning port
#[async_trait]
pub trait SubdomainProvisioner: Send + Sync {
    async fn provision(&self, agency: &Agency) -> Result<()>;
}

/// GoDaddy DNS credentials and target
#[derive(Clone, Debug)]
pub struct GoDaddyConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Apex domain the subdomains live under
    pub domain: String,
    /// IP address the `A` records point at
    pub target_ip: String,
    pub api_url: String,
}

impl GoDaddyConfig {
    /// Create from environment variables
    pub fn from_env(domain: &str) -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| AgencyError::Config(format!("{name} not set")))
        };

        Ok(Self {
            api_key: var("GODADDY_API_KEY")?,
            api_secret: var("GODADDY_API_SECRET")?,
            domain: domain.to_string(),
            target_ip: var("DEPLOY_TARGET_IP")?,
            api_url: std::env::var("GODADDY_API_URL").unwrap_or_else(|_| GODADDY_API_URL.into()),
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct DnsRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    data: &'a str,
    ttl: u32,
}

/// GoDaddy-backed provisioner
pub struct GoDaddyProvisioner {
    client: reqwest::Client,
    config: GoDaddyConfig,
}

impl GoDaddyProvisioner {
    pub fn new(config: GoDaddyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn records<'a>(&'a self, subdomain: &'a str) -> Vec<DnsRecord<'a>> {
        vec![DnsRecord {
            kind: "A",
            name: subdomain,
            data: &self.config.target_ip,
            ttl: RECORD_TTL_SECS,
        }]
    }
}

#[async_trait]
impl SubdomainProvisioner for GoDaddyProvisioner {
    async fn provision(&self, agency: &Agency) -> Result<()> {
        let url = format!(
            "{}/domains/{}/records",
            self.config.api_url.trim_end_matches('/'),
            self.config.domain
        );

        let response = self
            .client
            .patch(&url)
            .header(
                "Authorization",
                format!("sso-key {}:{}", self.config.api_key, self.config.api_secret),
            )
            .json(&self.records(&agency.subdomain))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgencyError::Provisioning(format!(
                "Failed to create subdomain {}: {}",
                agency.subdomain,
                response.status()
            )));
        }

        tracing::info!(
            agency_id = %agency.id,
            subdomain = %agency.subdomain,
            domain = %self.config.domain,
            "Provisioned subdomain DNS record"
        );
        Ok(())
    }
}

/// Logs instead of calling out (development)
#[derive(Clone, Debug, Default)]
pub struct LoggingProvisioner;

#[async_trait]
impl SubdomainProvisioner for LoggingProvisioner {
    async fn provision(&self, agency: &Agency) -> Result<()> {
        tracing::info!(
            agency_id = %agency.id,
            subdomain = %agency.subdomain,
            "Subdomain provisioning skipped (no DNS credentials)"
        );
        Ok(())
    }
}
