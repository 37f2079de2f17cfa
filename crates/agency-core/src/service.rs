//! Agency Workflows
//!
//! Each operation is an auth-scoped lookup followed by a store call. The
//! caller has already been resolved to a [`UserId`] by the session oracle.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::agency::{Agency, Branding, normalize_subdomain};
use crate::analytics::LeadAnalytics;
use crate::error::{AgencyError, Result};
use crate::id::{LeadId, UserId};
use crate::mailer::{EmailMessage, Mailer};
use crate::model::{Agent, Commission, Invitation, Lead, LeadStatus, Role, User, require, validate_email};
use crate::provisioning::SubdomainProvisioner;
use crate::store::{
    AgencyStore, AgentStore, CommissionStore, InvitationStore, LeadFilter, LeadStore, Store, UserStore,
};

/// Agency registration request
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterAgency {
    pub name: String,
    pub subdomain: String,
    #[serde(flatten)]
    pub branding: Branding,
}

/// Settings the workflows need from configuration
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    /// Public base URL of the application
    pub app_url: String,
    /// Sender address for outbound mail
    pub mail_from: String,
}

/// Tenant-scoped operations over the injected collaborators
#[derive(Clone)]
pub struct AgencyService {
    store: Arc<dyn Store>,
    provisioner: Arc<dyn SubdomainProvisioner>,
    mailer: Arc<dyn Mailer>,
    settings: ServiceSettings,
}

impl AgencyService {
    pub fn new(
        store: Arc<dyn Store>,
        provisioner: Arc<dyn SubdomainProvisioner>,
        mailer: Arc<dyn Mailer>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            provisioner,
            mailer,
            settings,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Create a plain user account
    pub async fn signup(&self, name: &str, email: &str) -> Result<User> {
        require("name", name)?;
        validate_email(email)?;

        let user = User::new(name.trim(), email);
        self.store.create_user(&user).await?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Load the caller
    pub async fn caller(&self, user_id: &UserId) -> Result<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AgencyError::NotFound("User".into()))
    }

    /// Load the caller together with the agency they belong to
    pub async fn caller_agency(&self, user_id: &UserId) -> Result<(User, Agency)> {
        let not_found = || AgencyError::NotFound("User or agency".into());

        let user = self.store.get_user(user_id).await?.ok_or_else(not_found)?;
        let agency_id = user.agency_id.clone().ok_or_else(not_found)?;
        let agency = self.store.get_agency(&agency_id).await?.ok_or_else(not_found)?;

        Ok((user, agency))
    }

    /// Resolve a tenant by subdomain
    pub async fn agency_by_subdomain(&self, subdomain: &str) -> Result<Agency> {
        let subdomain = subdomain.trim().to_lowercase();
        self.store
            .find_agency_by_subdomain(&subdomain)
            .await?
            .ok_or_else(|| AgencyError::NotFound("Agency".into()))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register an agency, make the caller its admin and provision the subdomain
    pub async fn register_agency(&self, user_id: &UserId, request: RegisterAgency) -> Result<Agency> {
        require("name", &request.name)?;
        let subdomain = normalize_subdomain(&request.subdomain)?;

        let user = self.caller(user_id).await?;
        if user.agency_id.is_some() {
            return Err(AgencyError::Conflict("User already belongs to an agency".into()));
        }

        let agency = Agency::new(request.name.trim(), subdomain, request.branding);
        self.store.create_agency(&agency).await?;
        self.store
            .assign_agency(user_id, &agency.id, Role::AgencyAdmin)
            .await?;

        tracing::info!(
            agency_id = %agency.id,
            subdomain = %agency.subdomain,
            admin = %user_id,
            "Registered agency"
        );

        self.provisioner.provision(&agency).await.inspect_err(|e| {
            tracing::error!(agency_id = %agency.id, error = %e, "Subdomain provisioning failed");
        })?;

        Ok(agency)
    }

    // ========================================================================
    // Affiliates
    // ========================================================================

    pub async fn list_agents(&self, user_id: &UserId) -> Result<Vec<Agent>> {
        let (_, agency) = self.caller_agency(user_id).await?;
        self.store.list_agents(&agency.id).await
    }

    pub async fn create_agent(&self, user_id: &UserId, name: &str, email: &str) -> Result<Agent> {
        require("name", name)?;
        validate_email(email)?;

        let (_, agency) = self.caller_agency(user_id).await?;
        let agent = Agent::new(agency.id, name.trim(), email);
        self.store.create_agent(&agent).await?;

        tracing::info!(agent_id = %agent.id, agency_id = %agent.agency_id, "Created agent");
        Ok(agent)
    }

    /// Record an invitation on the tenant and email the invitee
    pub async fn invite(&self, subdomain: &str, user_id: &UserId, email: &str) -> Result<Invitation> {
        validate_email(email)?;

        let agency = self.agency_by_subdomain(subdomain).await?;
        let invitation = Invitation::new(agency.id.clone(), user_id.clone(), email);
        self.store.create_invitation(&invitation).await?;

        let message = EmailMessage::invitation(
            &self.settings.mail_from,
            &self.settings.app_url,
            &agency,
            &invitation,
        );
        self.mailer.send(&message).await?;

        tracing::info!(
            invitation_id = %invitation.id,
            agency_id = %agency.id,
            "Sent invitation"
        );
        Ok(invitation)
    }

    // ========================================================================
    // Leads
    // ========================================================================

    /// All leads of the caller's agency
    pub async fn list_leads(&self, user_id: &UserId) -> Result<Vec<Lead>> {
        let (_, agency) = self.caller_agency(user_id).await?;
        self.store.list_leads(&LeadFilter::agency(agency.id)).await
    }

    pub async fn create_lead(&self, user_id: &UserId, title: &str, description: &str) -> Result<Lead> {
        let (user, agency) = self.caller_agency(user_id).await?;
        self.insert_lead(agency, user.id, title, description).await
    }

    /// Leads the caller captured on a tenant's subdomain
    pub async fn list_tenant_leads(&self, subdomain: &str, user_id: &UserId) -> Result<Vec<Lead>> {
        let agency = self.agency_by_subdomain(subdomain).await?;
        self.store
            .list_leads(&LeadFilter::agency_user(agency.id, user_id.clone()))
            .await
    }

    pub async fn create_tenant_lead(
        &self,
        subdomain: &str,
        user_id: &UserId,
        title: &str,
        description: &str,
    ) -> Result<Lead> {
        let agency = self.agency_by_subdomain(subdomain).await?;
        self.insert_lead(agency, user_id.clone(), title, description).await
    }

    async fn insert_lead(&self, agency: Agency, user_id: UserId, title: &str, description: &str) -> Result<Lead> {
        require("title", title)?;

        let lead = Lead::new(agency.id, user_id, title.trim(), description.trim());
        self.store.create_lead(&lead).await?;

        tracing::info!(lead_id = %lead.id, agency_id = %lead.agency_id, "Captured lead");
        Ok(lead)
    }

    /// Move a lead of the caller's agency to a new status
    pub async fn update_lead_status(&self, user_id: &UserId, lead_id: &LeadId, status: LeadStatus) -> Result<Lead> {
        let (_, agency) = self.caller_agency(user_id).await?;

        match self.store.get_lead(lead_id).await? {
            Some(lead) if lead.agency_id == agency.id => {}
            _ => return Err(AgencyError::NotFound("Lead".into())),
        }

        let lead = self.store.update_lead_status(lead_id, status).await?;
        tracing::info!(lead_id = %lead.id, status = ?lead.status, "Updated lead status");
        Ok(lead)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub async fn commissions(&self, subdomain: &str, user_id: &UserId) -> Result<Vec<Commission>> {
        let agency = self.agency_by_subdomain(subdomain).await?;
        self.store.list_commissions(&agency.id, user_id).await
    }

    pub async fn analytics(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<LeadAnalytics> {
        let (_, agency) = self.caller_agency(user_id).await?;
        let leads = self.store.list_leads(&LeadFilter::agency(agency.id)).await?;
        Ok(LeadAnalytics::compute(&leads, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MemoryMailer;
    use crate::memory::MemoryStore;
    use crate::provisioning::LoggingProvisioner;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct FailingProvisioner;

    #[async_trait]
    impl SubdomainProvisioner for FailingProvisioner {
        async fn provision(&self, _agency: &Agency) -> Result<()> {
            Err(AgencyError::Provisioning("dns down".into()))
        }
    }

    fn settings() -> ServiceSettings {
        ServiceSettings {
            app_url: "https://agencyhub.test".into(),
            mail_from: "no-reply@agencyhub.test".into(),
        }
    }

    fn service_with(mailer: Arc<MemoryMailer>) -> AgencyService {
        AgencyService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LoggingProvisioner),
            mailer,
            settings(),
        )
    }

    fn register(subdomain: &str) -> RegisterAgency {
        RegisterAgency {
            name: "Coastal Homes".into(),
            subdomain: subdomain.into(),
            branding: Branding::default(),
        }
    }

    async fn admin_with_agency(service: &AgencyService, subdomain: &str) -> (User, Agency) {
        let user = service.signup("Lerato Mokoena", &format!("{subdomain}@example.com")).await.unwrap();
        let agency = service.register_agency(&user.id, register(subdomain)).await.unwrap();
        (user, agency)
    }

    #[tokio::test]
    async fn test_register_promotes_caller() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        let (user, agency) = admin_with_agency(&service, "Coastal").await;

        assert_eq!(agency.subdomain, "coastal");
        let (admin, owned) = service.caller_agency(&user.id).await.unwrap();
        assert_eq!(admin.role, Role::AgencyAdmin);
        assert_eq!(owned.id, agency.id);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_subdomain() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        admin_with_agency(&service, "coastal").await;

        let other = service.signup("Other", "other@example.com").await.unwrap();
        let err = service.register_agency(&other.id, register("coastal")).await.unwrap_err();
        assert!(matches!(err, AgencyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_reports_provisioning_failure() {
        let service = AgencyService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingProvisioner),
            Arc::new(MemoryMailer::new()),
            settings(),
        );
        let user = service.signup("Sipho", "sipho@example.com").await.unwrap();

        let err = service.register_agency(&user.id, register("inland")).await.unwrap_err();
        assert!(matches!(err, AgencyError::Provisioning(_)));
    }

    #[tokio::test]
    async fn test_user_without_agency() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        let user = service.signup("Nomsa", "nomsa@example.com").await.unwrap();

        let err = service.list_leads(&user.id).await.unwrap_err();
        assert!(matches!(err, AgencyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_leads_and_analytics() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        let (user, _) = admin_with_agency(&service, "coastal").await;

        let lead = service.create_lead(&user.id, "Beach house", "Budget R3m").await.unwrap();
        service.create_lead(&user.id, "Flat", "").await.unwrap();
        service
            .update_lead_status(&user.id, &lead.id, LeadStatus::Converted)
            .await
            .unwrap();

        let analytics = service.analytics(&user.id, Utc::now()).await.unwrap();
        assert_eq!(analytics.total_leads, 2);
        assert_eq!(analytics.converted_leads, 1);
        assert_eq!(analytics.weekly_stats.iter().map(|w| w.received).sum::<u64>(), 2);
    }

    #[tokio::test]
    async fn test_cannot_update_other_agency_lead() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        let (alice, _) = admin_with_agency(&service, "coastal").await;
        let (bob, _) = admin_with_agency(&service, "inland").await;

        let lead = service.create_lead(&alice.id, "Farm", "").await.unwrap();
        let err = service
            .update_lead_status(&bob.id, &lead.id, LeadStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, AgencyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tenant_leads_scoped_to_caller() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        admin_with_agency(&service, "coastal").await;
        let affiliate = service.signup("Affiliate", "aff@example.com").await.unwrap();

        service
            .create_tenant_lead("coastal", &affiliate.id, "Townhouse", "")
            .await
            .unwrap();

        let mine = service.list_tenant_leads("coastal", &affiliate.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, affiliate.id);

        let missing = service.list_tenant_leads("nowhere", &affiliate.id).await.unwrap_err();
        assert!(matches!(missing, AgencyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invite_sends_email() {
        let mailer = Arc::new(MemoryMailer::new());
        let service = service_with(mailer.clone());
        let (user, _) = admin_with_agency(&service, "coastal").await;

        let invitation = service.invite("coastal", &user.id, "new@agent.com").await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "new@agent.com");
        assert!(sent[0].html.contains(&format!("invitation={}", invitation.id)));
    }

    #[tokio::test]
    async fn test_agents_and_commissions() {
        let service = service_with(Arc::new(MemoryMailer::new()));
        let (user, agency) = admin_with_agency(&service, "coastal").await;

        service.create_agent(&user.id, "Pieter", "pieter@example.com").await.unwrap();
        assert_eq!(service.list_agents(&user.id).await.unwrap().len(), 1);

        service
            .store()
            .record_commission(&Commission::new(agency.id, user.id.clone(), None, dec!(2500)))
            .await
            .unwrap();
        let commissions = service.commissions("coastal", &user.id).await.unwrap();
        assert_eq!(commissions.len(), 1);
    }
}
