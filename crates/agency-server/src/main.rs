//! agency-hub HTTP Server
//!
//! Multi-tenant backend for estate agencies: registration, subdomains,
//! affiliates, leads, analytics and PayFast subscriptions.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agency_core::{
    GoDaddyConfig, GoDaddyProvisioner, LoggingMailer, LoggingProvisioner, MemorySessions,
    MemoryStore, SubdomainProvisioner,
};
use agency_payments::PayFast;
use agency_server::{AppConfig, AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize payments
    let payfast = match PayFast::from_env(&config.app_url) {
        Ok(payfast) => {
            tracing::info!(sandbox = payfast.config().sandbox, "✓ PayFast configured");
            Some(payfast)
        }
        Err(e) => {
            tracing::warn!("⚠ PayFast not configured - payments disabled ({})", e);
            tracing::warn!("  Set PAYFAST_MERCHANT_ID, PAYFAST_MERCHANT_KEY and PAYFAST_PASSPHRASE in .env");
            None
        }
    };

    // Subdomain provisioning
    let provisioner: Arc<dyn SubdomainProvisioner> = match GoDaddyConfig::from_env(&config.main_domain) {
        Ok(godaddy) => {
            tracing::info!(domain = %godaddy.domain, "✓ GoDaddy DNS configured");
            Arc::new(GoDaddyProvisioner::new(godaddy))
        }
        Err(_) => {
            tracing::warn!("⚠ GoDaddy not configured - subdomains will not be provisioned");
            Arc::new(LoggingProvisioner)
        }
    };

    // Build application state
    let state = AppState::new(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemorySessions::new()),
        provisioner,
        Arc::new(LoggingMailer),
        payfast,
    );

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🏠 agency-hub server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  POST /api/auth/signup             - Create account");
    tracing::info!("  POST /api/agency/register         - Register agency + subdomain");
    tracing::info!("  GET  /api/agents | /api/leads     - Agency affiliates and leads");
    tracing::info!("  GET  /api/analytics               - Lead analytics");
    tracing::info!("  POST /api/subscription            - Start PayFast payment");
    tracing::info!("  POST /api/subscription/notify     - PayFast notification");
    tracing::info!("  *    /api/{{subdomain}}/...         - Tenant leads, invites, commissions");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
