//! In-memory store (for development and tests)

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::agency::{Agency, SubscriptionChange};
use crate::error::{AgencyError, Result};
use crate::id::{AgencyId, AgentId, CommissionId, InvitationId, LeadId, UserId};
use crate::model::{Agent, Commission, Invitation, Lead, LeadStatus, Role, User};
use crate::store::{
    AgencyStore, AgentStore, CommissionStore, InvitationStore, LeadFilter, LeadStore, UserStore,
};

/// In-memory implementation of every store port
#[derive(Default)]
pub struct MemoryStore {
    agencies: RwLock<HashMap<AgencyId, Agency>>,
    users: RwLock<HashMap<UserId, User>>,
    leads: RwLock<HashMap<LeadId, Lead>>,
    agents: RwLock<HashMap<AgentId, Agent>>,
    invitations: RwLock<HashMap<InvitationId, Invitation>>,
    commissions: RwLock<HashMap<CommissionId, Commission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgencyStore for MemoryStore {
    async fn create_agency(&self, agency: &Agency) -> Result<()> {
        let mut agencies = self.agencies.write().await;

        if agencies.values().any(|a| a.subdomain == agency.subdomain) {
            return Err(AgencyError::Conflict("Subdomain is already taken".into()));
        }
        if agencies.contains_key(&agency.id) {
            return Err(AgencyError::Conflict(format!("Agency {} already exists", agency.id)));
        }

        agencies.insert(agency.id.clone(), agency.clone());
        Ok(())
    }

    async fn get_agency(&self, id: &AgencyId) -> Result<Option<Agency>> {
        Ok(self.agencies.read().await.get(id).cloned())
    }

    async fn find_agency_by_subdomain(&self, subdomain: &str) -> Result<Option<Agency>> {
        let agencies = self.agencies.read().await;
        Ok(agencies.values().find(|a| a.subdomain == subdomain).cloned())
    }

    async fn apply_subscription(&self, id: &AgencyId, change: &SubscriptionChange) -> Result<Agency> {
        let mut agencies = self.agencies.write().await;
        let agency = agencies
            .get_mut(id)
            .ok_or_else(|| AgencyError::NotFound("Agency".into()))?;

        agency.apply(change);
        Ok(agency.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AgencyError::Conflict("Email is already registered".into()));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn assign_agency(&self, id: &UserId, agency_id: &AgencyId, role: Role) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AgencyError::NotFound("User".into()))?;

        user.agency_id = Some(agency_id.clone());
        user.role = role;
        Ok(user.clone())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_lead(&self, lead: &Lead) -> Result<()> {
        self.leads.write().await.insert(lead.id.clone(), lead.clone());
        Ok(())
    }

    async fn get_lead(&self, id: &LeadId) -> Result<Option<Lead>> {
        Ok(self.leads.read().await.get(id).cloned())
    }

    async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>> {
        let leads = self.leads.read().await;
        let mut matching: Vec<Lead> = leads.values().filter(|l| filter.matches(l)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_lead_status(&self, id: &LeadId, status: LeadStatus) -> Result<Lead> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(id)
            .ok_or_else(|| AgencyError::NotFound("Lead".into()))?;

        lead.status = status;
        Ok(lead.clone())
    }
}

#[async_trait]
impl AgentStore for MemoryStore {
    async fn create_agent(&self, agent: &Agent) -> Result<()> {
        self.agents.write().await.insert(agent.id.clone(), agent.clone());
        Ok(())
    }

    async fn list_agents(&self, agency_id: &AgencyId) -> Result<Vec<Agent>> {
        let agents = self.agents.read().await;
        let mut matching: Vec<Agent> = agents
            .values()
            .filter(|a| &a.agency_id == agency_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn create_invitation(&self, invitation: &Invitation) -> Result<()> {
        self.invitations
            .write()
            .await
            .insert(invitation.id.clone(), invitation.clone());
        Ok(())
    }

    async fn get_invitation(&self, id: &InvitationId) -> Result<Option<Invitation>> {
        Ok(self.invitations.read().await.get(id).cloned())
    }
}

#[async_trait]
impl CommissionStore for MemoryStore {
    async fn record_commission(&self, commission: &Commission) -> Result<()> {
        self.commissions
            .write()
            .await
            .insert(commission.id.clone(), commission.clone());
        Ok(())
    }

    async fn list_commissions(&self, agency_id: &AgencyId, user_id: &UserId) -> Result<Vec<Commission>> {
        let commissions = self.commissions.read().await;
        let mut matching: Vec<Commission> = commissions
            .values()
            .filter(|c| &c.agency_id == agency_id && &c.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agency::{Branding, SubscriptionPlan, SubscriptionStatus};
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_subdomain_is_unique() {
        let store = MemoryStore::new();
        store
            .create_agency(&Agency::new("Acme", "acme", Branding::default()))
            .await
            .unwrap();

        let err = store
            .create_agency(&Agency::new("Acme Two", "acme", Branding::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, AgencyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_by_subdomain() {
        let store = MemoryStore::new();
        let agency = Agency::new("Acme", "acme", Branding::default());
        store.create_agency(&agency).await.unwrap();

        let found = store.find_agency_by_subdomain("acme").await.unwrap().unwrap();
        assert_eq!(found.id, agency.id);
        assert!(store.find_agency_by_subdomain("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_apply_subscription_missing_agency() {
        let store = MemoryStore::new();
        let change = SubscriptionChange::activate(SubscriptionPlan::Pro, Utc::now(), Duration::days(30));

        let err = store
            .apply_subscription(&AgencyId::from_string("ghost"), &change)
            .await
            .unwrap_err();
        assert!(matches!(err, AgencyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_subscription_updates_triple() {
        let store = MemoryStore::new();
        let agency = Agency::new("Acme", "acme", Branding::default());
        store.create_agency(&agency).await.unwrap();

        let now = Utc::now();
        let change = SubscriptionChange::activate(SubscriptionPlan::Basic, now, Duration::days(30));
        store.apply_subscription(&agency.id, &change).await.unwrap();

        let stored = store.get_agency(&agency.id).await.unwrap().unwrap();
        assert_eq!(stored.subscription_plan, Some(SubscriptionPlan::Basic));
        assert_eq!(stored.subscription_status, SubscriptionStatus::Active);
        assert_eq!(stored.subscription_expires_at, Some(now + Duration::days(30)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(&User::new("A", "a@example.com")).await.unwrap();
        let err = store.create_user(&User::new("B", "A@example.com")).await.unwrap_err();
        assert!(matches!(err, AgencyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lead_filtering_by_user() {
        let store = MemoryStore::new();
        let agency_id = AgencyId::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store.create_lead(&Lead::new(agency_id.clone(), alice.clone(), "a", "")).await.unwrap();
        store.create_lead(&Lead::new(agency_id.clone(), bob.clone(), "b", "")).await.unwrap();
        store.create_lead(&Lead::new(AgencyId::new(), alice.clone(), "c", "")).await.unwrap();

        let all = store.list_leads(&LeadFilter::agency(agency_id.clone())).await.unwrap();
        assert_eq!(all.len(), 2);

        let mine = store
            .list_leads(&LeadFilter::agency_user(agency_id, alice))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a");
    }

    #[tokio::test]
    async fn test_commissions_scoped_to_agency_and_user() {
        let store = MemoryStore::new();
        let agency_id = AgencyId::new();
        let user_id = UserId::new();

        store
            .record_commission(&Commission::new(agency_id.clone(), user_id.clone(), None, dec!(1500.00)))
            .await
            .unwrap();
        store
            .record_commission(&Commission::new(AgencyId::new(), user_id.clone(), None, dec!(10)))
            .await
            .unwrap();

        let listed = store.list_commissions(&agency_id, &user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, dec!(1500));
    }
}
