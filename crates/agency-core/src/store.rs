//! Storage Ports
//!
//! Entity stores are injected into workflows and handlers as trait objects,
//! so the in-memory store can stand in for a database in tests.

use async_trait::async_trait;

use crate::agency::{Agency, SubscriptionChange};
use crate::error::Result;
use crate::id::{AgencyId, InvitationId, LeadId, UserId};
use crate::model::{Agent, Commission, Invitation, Lead, LeadStatus, Role, User};

/// Agency (tenant) storage
#[async_trait]
pub trait AgencyStore: Send + Sync {
    /// Insert a new agency. Fails with `Conflict` if the subdomain is taken.
    async fn create_agency(&self, agency: &Agency) -> Result<()>;

    async fn get_agency(&self, id: &AgencyId) -> Result<Option<Agency>>;

    /// Resolve a tenant by its subdomain
    async fn find_agency_by_subdomain(&self, subdomain: &str) -> Result<Option<Agency>>;

    /// Apply plan, status and expiry in one atomic update.
    ///
    /// Fails with `NotFound` (and writes nothing) if the agency is absent.
    async fn apply_subscription(&self, id: &AgencyId, change: &SubscriptionChange) -> Result<Agency>;
}

/// User storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Link a user to an agency with the given role
    async fn assign_agency(&self, id: &UserId, agency_id: &AgencyId, role: Role) -> Result<User>;
}

/// Lead query filter
#[derive(Clone, Debug)]
pub struct LeadFilter {
    pub agency_id: AgencyId,
    /// Restrict to leads captured by this user
    pub user_id: Option<UserId>,
}

impl LeadFilter {
    pub fn agency(agency_id: AgencyId) -> Self {
        Self { agency_id, user_id: None }
    }

    pub fn agency_user(agency_id: AgencyId, user_id: UserId) -> Self {
        Self { agency_id, user_id: Some(user_id) }
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        lead.agency_id == self.agency_id
            && self.user_id.as_ref().is_none_or(|user_id| &lead.user_id == user_id)
    }
}

/// Lead storage
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create_lead(&self, lead: &Lead) -> Result<()>;

    async fn get_lead(&self, id: &LeadId) -> Result<Option<Lead>>;

    /// Leads matching the filter, newest first
    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>>;

    async fn update_lead_status(&self, id: &LeadId, status: LeadStatus) -> Result<Lead>;
}

/// Affiliate agent storage
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn create_agent(&self, agent: &Agent) -> Result<()>;

    async fn list_agents(&self, agency_id: &AgencyId) -> Result<Vec<Agent>>;
}

/// Invitation storage
#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn create_invitation(&self, invitation: &Invitation) -> Result<()>;

    async fn get_invitation(&self, id: &InvitationId) -> Result<Option<Invitation>>;
}

/// Commission storage
#[async_trait]
pub trait CommissionStore: Send + Sync {
    async fn record_commission(&self, commission: &Commission) -> Result<()>;

    /// Commissions for a user within an agency, newest first
    async fn list_commissions(&self, agency_id: &AgencyId, user_id: &UserId) -> Result<Vec<Commission>>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store:
    AgencyStore + UserStore + LeadStore + AgentStore + InvitationStore + CommissionStore
{
}

impl<T> Store for T where
    T: AgencyStore + UserStore + LeadStore + AgentStore + InvitationStore + CommissionStore
{
}
