//! Agency (Tenant) Model
//!
//! An agency owns a subdomain, its branding and a subscription. The
//! subscription fields only ever change together through
//! [`SubscriptionChange`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AgencyError;
use crate::id::AgencyId;

/// Subscription plan tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Basic,
    Pro,
    Enterprise,
}

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 3] = [Self::Basic, Self::Pro, Self::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Basic => "basic",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }

    /// Human-readable plan name
    pub fn display_name(&self) -> &'static str {
        match self {
            SubscriptionPlan::Basic => "Basic",
            SubscriptionPlan::Pro => "Pro",
            SubscriptionPlan::Enterprise => "Enterprise",
        }
    }

    /// Monthly price in ZAR
    pub fn price(&self) -> Decimal {
        match self {
            SubscriptionPlan::Basic => dec!(99.00),
            SubscriptionPlan::Pro => dec!(199.00),
            SubscriptionPlan::Enterprise => dec!(499.00),
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = AgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str() == s)
            .ok_or_else(|| AgencyError::Validation(format!("Unknown plan: {s}")))
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Active,
}

/// The subscription triple, applied atomically by the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionChange {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub expires_at: DateTime<Utc>,
}

impl SubscriptionChange {
    /// Activate `plan` until `now + renewal_window`
    pub fn activate(plan: SubscriptionPlan, now: DateTime<Utc>, renewal_window: chrono::Duration) -> Self {
        Self {
            plan,
            status: SubscriptionStatus::Active,
            expires_at: now + renewal_window,
        }
    }
}

/// Optional branding shown on the agency's subdomain
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub about_us: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}

/// An agency record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub subdomain: String,
    #[serde(flatten)]
    pub branding: Branding,
    pub subscription_plan: Option<SubscriptionPlan>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Agency {
    /// Create a new agency with no subscription
    pub fn new(name: impl Into<String>, subdomain: impl Into<String>, branding: Branding) -> Self {
        Self {
            id: AgencyId::new(),
            name: name.into(),
            subdomain: subdomain.into(),
            branding,
            subscription_plan: None,
            subscription_status: SubscriptionStatus::Inactive,
            subscription_expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Apply all three subscription fields
    pub fn apply(&mut self, change: &SubscriptionChange) {
        self.subscription_plan = Some(change.plan);
        self.subscription_status = change.status;
        self.subscription_expires_at = Some(change.expires_at);
    }

    /// Active and not past its expiry.
    ///
    /// Nothing flips the status back to inactive when the window lapses, so
    /// gated features must check this rather than the raw status.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.subscription_status == SubscriptionStatus::Active
            && self.subscription_expires_at.is_some_and(|expires| now < expires)
    }
}

/// Labels taken by fixed `/api/{segment}` routes
pub const RESERVED_SUBDOMAINS: [&str; 6] = ["agency", "agents", "analytics", "auth", "leads", "subscription"];

/// Normalize and validate a subdomain label
pub fn normalize_subdomain(raw: &str) -> Result<String, AgencyError> {
    let subdomain = raw.trim().to_lowercase();

    let valid_chars = subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if subdomain.is_empty()
        || subdomain.len() > 63
        || !valid_chars
        || subdomain.starts_with('-')
        || subdomain.ends_with('-')
    {
        return Err(AgencyError::Validation(format!("Invalid subdomain: {raw}")));
    }
    if RESERVED_SUBDOMAINS.contains(&subdomain.as_str()) {
        return Err(AgencyError::Validation(format!("Subdomain is reserved: {subdomain}")));
    }

    Ok(subdomain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_plan_parsing() {
        assert_eq!("pro".parse::<SubscriptionPlan>().unwrap(), SubscriptionPlan::Pro);
        assert_eq!("enterprise".parse::<SubscriptionPlan>().unwrap(), SubscriptionPlan::Enterprise);
        assert!("platinum".parse::<SubscriptionPlan>().is_err());
        assert!("Pro".parse::<SubscriptionPlan>().is_err());
    }

    #[test]
    fn test_plan_pricing() {
        assert_eq!(SubscriptionPlan::Basic.price(), dec!(99));
        assert_eq!(SubscriptionPlan::Enterprise.price().to_string(), "499.00");
    }

    #[test]
    fn test_new_agency_is_inactive() {
        let agency = Agency::new("Acme Realty", "acme", Branding::default());
        assert_eq!(agency.subscription_status, SubscriptionStatus::Inactive);
        assert!(agency.subscription_plan.is_none());
        assert!(!agency.has_active_subscription(Utc::now()));
    }

    #[test]
    fn test_apply_sets_all_fields() {
        let now = Utc::now();
        let mut agency = Agency::new("Acme Realty", "acme", Branding::default());
        agency.apply(&SubscriptionChange::activate(SubscriptionPlan::Pro, now, Duration::days(30)));

        assert_eq!(agency.subscription_plan, Some(SubscriptionPlan::Pro));
        assert_eq!(agency.subscription_status, SubscriptionStatus::Active);
        assert_eq!(agency.subscription_expires_at, Some(now + Duration::days(30)));
        assert!(agency.has_active_subscription(now));
        assert!(!agency.has_active_subscription(now + Duration::days(31)));
    }

    #[test]
    fn test_subdomain_normalization() {
        assert_eq!(normalize_subdomain("  Acme-Realty ").unwrap(), "acme-realty");
        assert!(normalize_subdomain("").is_err());
        assert!(normalize_subdomain("-acme").is_err());
        assert!(normalize_subdomain("acme.co").is_err());
        assert!(normalize_subdomain(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_route_segments_are_reserved() {
        for label in RESERVED_SUBDOMAINS {
            assert!(
                matches!(normalize_subdomain(label), Err(AgencyError::Validation(_))),
                "{label}"
            );
        }
        assert!(normalize_subdomain(" Leads ").is_err());
        assert_eq!(normalize_subdomain("leads-co").unwrap(), "leads-co");
    }
}
