//! Payment References
//!
//! A payment is correlated with its notification through `m_payment_id`,
//! the composite `{agency_id}-{plan}`. The two parts also travel as separate
//! custom fields (`custom_str1`, `custom_str2`) so the round-trip never
//! depends on splitting the composite alone.

use agency_core::{AgencyId, SubscriptionPlan};

use crate::error::{PaymentError, Result};

const SEPARATOR: char = '-';

/// Field carrying the composite reference
pub const REFERENCE_FIELD: &str = "m_payment_id";
/// Field carrying the agency id on its own
pub const AGENCY_FIELD: &str = "custom_str1";
/// Field carrying the plan id on its own
pub const PLAN_FIELD: &str = "custom_str2";

/// Agency and plan a payment was initiated for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentReference {
    pub agency_id: AgencyId,
    pub plan: SubscriptionPlan,
}

impl PaymentReference {
    pub fn new(agency_id: AgencyId, plan: SubscriptionPlan) -> Self {
        Self { agency_id, plan }
    }

    /// Split a composite reference on the first separator
    pub fn parse(reference: &str) -> Result<Self> {
        let (agency_id, plan_id) = split(reference)?;
        Self::from_parts(agency_id, plan_id)
    }

    /// Build from the separately carried agency and plan ids
    pub fn from_parts(agency_id: &str, plan_id: &str) -> Result<Self> {
        if agency_id.is_empty() || plan_id.is_empty() {
            return Err(PaymentError::MalformedReference(format!("{agency_id}{SEPARATOR}{plan_id}")));
        }

        let plan = plan_id
            .parse::<SubscriptionPlan>()
            .map_err(|_| PaymentError::InvalidPlan(plan_id.to_string()))?;

        Ok(Self::new(AgencyId::from_string(agency_id), plan))
    }

    /// Resolve from notification fields.
    ///
    /// When the structured fields are present they win, but the composite
    /// must still spell exactly the same pair.
    pub fn from_fields(composite: &str, agency_id: Option<&str>, plan_id: Option<&str>) -> Result<Self> {
        let (agency_id, plan_id) = locate(composite, agency_id, plan_id)?;
        Self::from_parts(agency_id, plan_id)
    }

    /// Agency named by the notification fields, without judging the plan
    pub fn agency_from_fields(
        composite: &str,
        agency_id: Option<&str>,
        plan_id: Option<&str>,
    ) -> Result<AgencyId> {
        let (agency_id, _) = locate(composite, agency_id, plan_id)?;
        Ok(AgencyId::from_string(agency_id))
    }
}

fn split(reference: &str) -> Result<(&str, &str)> {
    match reference.split_once(SEPARATOR) {
        Some((agency_id, plan_id)) if !agency_id.is_empty() && !plan_id.is_empty() => {
            Ok((agency_id, plan_id))
        }
        _ => Err(PaymentError::MalformedReference(reference.to_string())),
    }
}

/// Shape check: which (agency, plan) pair the fields carry
fn locate<'a>(
    composite: &'a str,
    agency_id: Option<&'a str>,
    plan_id: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    match (agency_id, plan_id) {
        (Some(agency_id), Some(plan_id)) => {
            if agency_id.is_empty()
                || plan_id.is_empty()
                || format!("{agency_id}{SEPARATOR}{plan_id}") != composite
            {
                return Err(PaymentError::MalformedReference(format!(
                    "{composite} does not match {agency_id}/{plan_id}"
                )));
            }
            Ok((agency_id, plan_id))
        }
        (None, None) => split(composite),
        _ => Err(PaymentError::MalformedReference(format!(
            "{composite}: incomplete structured reference"
        ))),
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.agency_id, self.plan)
    }
}
