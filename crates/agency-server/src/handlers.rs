//! HTTP Handlers

use axum::{
    Form, Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use agency_core::{
    Agency, Agent, Commission, Lead, LeadAnalytics, LeadId, LeadStatus, RegisterAgency,
    SubscriptionPlan, User,
};
use agency_payments::{CheckoutRequest, PaymentError};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AgencyResponse {
    pub message: &'static str,
    pub agency: Agency,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<Agent>,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub message: &'static str,
    pub agent: Agent,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub message: &'static str,
    pub lead: Lead,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CommissionsResponse {
    pub commissions: Vec<Commission>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub payment_url: String,
}

// ============================================================================
// Health & Accounts
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payfast.is_some(),
    })
}

/// Create a user and hand back a session token
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let user = state.service.signup(&payload.name, &payload.email).await?;
    let token = state.issuer.issue(&user.id).await?;

    Ok(Json(SignupResponse {
        message: "User created successfully",
        user,
        token,
    }))
}

/// Register an agency for the caller
pub async fn register_agency(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<RegisterAgency>,
) -> ApiResult<AgencyResponse> {
    let agency = state.service.register_agency(&user_id, payload).await?;

    Ok(Json(AgencyResponse {
        message: "Agency registered successfully",
        agency,
    }))
}

// ============================================================================
// Agents
// ============================================================================

pub async fn list_agents(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<AgentsResponse> {
    let agents = state.service.list_agents(&user_id).await?;
    Ok(Json(AgentsResponse { agents }))
}

pub async fn create_agent(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateAgentRequest>,
) -> ApiResult<AgentResponse> {
    let agent = state
        .service
        .create_agent(&user_id, &payload.name, &payload.email)
        .await?;

    Ok(Json(AgentResponse {
        message: "Agent created successfully",
        agent,
    }))
}

// ============================================================================
// Leads
// ============================================================================

pub async fn list_leads(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<LeadsResponse> {
    let leads = state.service.list_leads(&user_id).await?;
    Ok(Json(LeadsResponse { leads }))
}

pub async fn create_lead(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateLeadRequest>,
) -> ApiResult<LeadResponse> {
    let lead = state
        .service
        .create_lead(&user_id, &payload.title, &payload.description)
        .await?;

    Ok(Json(LeadResponse {
        message: "Lead created successfully",
        lead,
    }))
}

pub async fn update_lead(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(lead_id): Path<String>,
    Json(payload): Json<UpdateLeadRequest>,
) -> ApiResult<LeadResponse> {
    let lead = state
        .service
        .update_lead_status(&user_id, &LeadId::from_string(lead_id), payload.status)
        .await?;

    Ok(Json(LeadResponse {
        message: "Lead updated successfully",
        lead,
    }))
}

// ============================================================================
// Tenant (subdomain) routes
// ============================================================================

pub async fn list_tenant_leads(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(subdomain): Path<String>,
) -> ApiResult<LeadsResponse> {
    let leads = state.service.list_tenant_leads(&subdomain, &user_id).await?;
    Ok(Json(LeadsResponse { leads }))
}

pub async fn create_tenant_lead(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(subdomain): Path<String>,
    Json(payload): Json<CreateLeadRequest>,
) -> ApiResult<LeadResponse> {
    let lead = state
        .service
        .create_tenant_lead(&subdomain, &user_id, &payload.title, &payload.description)
        .await?;

    Ok(Json(LeadResponse {
        message: "Lead created successfully",
        lead,
    }))
}

pub async fn invite(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(subdomain): Path<String>,
    Json(payload): Json<InviteRequest>,
) -> ApiResult<MessageResponse> {
    state.service.invite(&subdomain, &user_id, &payload.email).await?;
    Ok(Json(MessageResponse::new("Invitation sent successfully")))
}

pub async fn list_commissions(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(subdomain): Path<String>,
) -> ApiResult<CommissionsResponse> {
    let commissions = state.service.commissions(&subdomain, &user_id).await?;
    Ok(Json(CommissionsResponse { commissions }))
}

// ============================================================================
// Analytics
// ============================================================================

pub async fn analytics(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<LeadAnalytics> {
    let analytics = state.service.analytics(&user_id, Utc::now()).await?;
    Ok(Json(analytics))
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Start a PayFast payment for the caller's agency
pub async fn create_subscription(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<SubscriptionRequest>,
) -> ApiResult<SubscriptionResponse> {
    let payfast = state.payfast.as_ref().ok_or_else(ApiError::payments_disabled)?;

    let plan = payload
        .plan_id
        .parse::<SubscriptionPlan>()
        .map_err(|_| PaymentError::InvalidPlan(payload.plan_id.clone()))?;

    let (user, agency) = state.service.caller_agency(&user_id).await?;
    let session = payfast.checkout(&CheckoutRequest {
        user: &user,
        agency: &agency,
        plan,
    })?;

    Ok(Json(SubscriptionResponse {
        payment_url: session.payment_url,
    }))
}

/// PayFast notification (ITN) webhook
pub async fn subscription_notify(
    State(state): State<AppState>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult<MessageResponse> {
    let payfast = state.payfast.as_ref().ok_or_else(ApiError::payments_disabled)?;

    let notification = state
        .notifications
        .parse_notification(form, payfast.passphrase())?;
    state.notifications.handle(&notification).await?;

    Ok(Json(MessageResponse::new("Notification processed successfully")))
}
