//! # agency-core
//!
//! Domain model, storage ports and tenant workflows for agency-hub.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         AgencyService                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │    Store     │  │    Mailer    │  │ SubdomainProvisioner │  │
//! │  │   (ports)    │  │    (port)    │  │        (port)        │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every collaborator is injected, so handlers run against
//! [`MemoryStore`] in tests and a database-backed store in production.

pub mod agency;
pub mod analytics;
pub mod error;
pub mod id;
pub mod mailer;
pub mod memory;
pub mod model;
pub mod provisioning;
pub mod service;
pub mod session;
pub mod store;

pub use agency::{Agency, Branding, SubscriptionChange, SubscriptionPlan, SubscriptionStatus};
pub use analytics::{LeadAnalytics, WeeklyStat};
pub use error::{AgencyError, Result};
pub use id::{AgencyId, AgentId, CommissionId, InvitationId, LeadId, UserId};
pub use mailer::{EmailMessage, LoggingMailer, Mailer, MemoryMailer};
pub use memory::MemoryStore;
pub use model::{Agent, Commission, Invitation, Lead, LeadStatus, Role, User};
pub use provisioning::{GoDaddyConfig, GoDaddyProvisioner, LoggingProvisioner, SubdomainProvisioner};
pub use service::{AgencyService, RegisterAgency, ServiceSettings};
pub use session::{CallerResolver, MemorySessions, SessionIssuer};
pub use store::{
    AgencyStore, AgentStore, CommissionStore, InvitationStore, LeadFilter, LeadStore, Store, UserStore,
};
