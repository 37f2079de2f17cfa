//! agency-hub HTTP Server
//!
//! Axum router over the agency workflows and PayFast subscription flow.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    analytics, create_agent, create_lead, create_subscription, create_tenant_lead, health_check,
    invite, list_agents, list_commissions, list_leads, list_tenant_leads, register_agency, signup,
    subscription_notify, update_lead,
};
pub use crate::config::AppConfig;
pub use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Accounts & agencies
        .route("/api/auth/signup", post(signup))
        .route("/api/agency/register", post(register_agency))

        // Caller's agency
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/{lead_id}", patch(update_lead))
        .route("/api/analytics", get(analytics))

        // Payments
        .route("/api/subscription", post(create_subscription))
        .route("/api/subscription/notify", post(subscription_notify))

        // Tenant by subdomain
        .route("/api/{subdomain}/leads", get(list_tenant_leads).post(create_tenant_lead))
        .route("/api/{subdomain}/invite", post(invite))
        .route("/api/{subdomain}/commissions", get(list_commissions))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
