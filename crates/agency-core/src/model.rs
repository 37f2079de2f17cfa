//! Domain Models
//!
//! Users, leads, affiliate agents, invitations and commissions. All of them
//! hang off an agency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AgencyError;
use crate::id::{AgencyId, AgentId, CommissionId, InvitationId, LeadId, UserId};

// ============================================================================
// Users
// ============================================================================

/// User role
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    AgencyAdmin,
}

/// A user account
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub agency_id: Option<AgencyId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            role: Role::User,
            agency_id: None,
            created_at: Utc::now(),
        }
    }

    /// Split the display name into (first, rest)
    pub fn name_parts(&self) -> (String, String) {
        let mut words = self.name.split_whitespace();
        let first = words.next().unwrap_or_default().to_string();
        let last = words.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

// ============================================================================
// Leads
// ============================================================================

/// Lead pipeline status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Rejected,
}

/// A captured lead
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Create a lead in the `New` state
    pub fn new(agency_id: AgencyId, user_id: UserId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: LeadId::new(),
            agency_id,
            user_id,
            title: title.into(),
            description: description.into(),
            status: LeadStatus::New,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Affiliates
// ============================================================================

/// An affiliate agent working for an agency
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub agency_id: AgencyId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(agency_id: AgencyId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: AgentId::new(),
            agency_id,
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            created_at: Utc::now(),
        }
    }
}

/// An invitation for an affiliate to join an agency
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub agency_id: AgencyId,
    pub invited_by: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(agency_id: AgencyId, invited_by: UserId, email: impl Into<String>) -> Self {
        Self {
            id: InvitationId::new(),
            agency_id,
            invited_by,
            email: email.into().trim().to_lowercase(),
            created_at: Utc::now(),
        }
    }
}

/// Commission earned by a user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub agency_id: AgencyId,
    pub user_id: UserId,
    pub lead_id: Option<LeadId>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Commission {
    pub fn new(agency_id: AgencyId, user_id: UserId, lead_id: Option<LeadId>, amount: Decimal) -> Self {
        Self {
            id: CommissionId::new(),
            agency_id,
            user_id,
            lead_id,
            amount,
            created_at: Utc::now(),
        }
    }
}

/// Minimal email shape check
pub fn validate_email(email: &str) -> Result<(), AgencyError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err(AgencyError::Validation(format!("Invalid email address: {email}"))),
    }
}

/// Reject blank required fields
pub fn require(field: &str, value: &str) -> Result<(), AgencyError> {
    if value.trim().is_empty() {
        return Err(AgencyError::Validation(format!("{field} is required")));
    }
    Ok(())
}
