//! PayFast Checkout
//!
//! Builds the signed redirect to PayFast's hosted payment page. The agency
//! admin is sent to `payment_url`; PayFast later posts the outcome to the
//! notify URL.

use agency_core::{Agency, SubscriptionPlan, User};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PayFastConfig;
use crate::error::{PaymentError, Result};
use crate::reference::{AGENCY_FIELD, PLAN_FIELD, PaymentReference, REFERENCE_FIELD};
use crate::signature::{self, SIGNATURE_FIELD};

/// PayFast client
pub struct PayFast {
    config: PayFastConfig,
}

impl PayFast {
    pub fn new(config: PayFastConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env(app_url: &str) -> Result<Self> {
        PayFastConfig::from_env(app_url).map(Self::new)
    }

    /// Shared passphrase used for notification signatures
    pub fn passphrase(&self) -> &str {
        &self.config.passphrase
    }

    pub fn config(&self) -> &PayFastConfig {
        &self.config
    }

    /// Ordered, unsigned field set for a subscription payment
    pub fn checkout_fields(&self, request: &CheckoutRequest<'_>) -> Vec<(&'static str, String)> {
        self.fields_for(request, &request.reference())
    }

    fn fields_for(&self, request: &CheckoutRequest<'_>, reference: &PaymentReference) -> Vec<(&'static str, String)> {
        let (name_first, name_last) = request.user.name_parts();
        let plan = reference.plan;

        vec![
            ("merchant_id", self.config.merchant_id.clone()),
            ("merchant_key", self.config.merchant_key.clone()),
            ("return_url", self.config.return_url.clone()),
            ("cancel_url", self.config.cancel_url.clone()),
            ("notify_url", self.config.notify_url.clone()),
            ("name_first", name_first),
            ("name_last", name_last),
            ("email_address", request.user.email.clone()),
            (REFERENCE_FIELD, reference.to_string()),
            ("amount", format!("{:.2}", plan.price())),
            ("item_name", format!("{} Plan Subscription", plan.display_name())),
            (AGENCY_FIELD, reference.agency_id.to_string()),
            (PLAN_FIELD, plan.as_str().to_string()),
        ]
    }

    /// Sign the field set and serialize it onto the process URL
    pub fn checkout(&self, request: &CheckoutRequest<'_>) -> Result<CheckoutSession> {
        let reference = request.reference();
        let mut fields = self.fields_for(request, &reference);
        let signature = signature::sign(fields.iter().map(|(k, v)| (*k, v.as_str())), self.passphrase());
        fields.push((SIGNATURE_FIELD, signature));

        let payment_url = Url::parse_with_params(self.config.process_url(), fields.iter())
            .map_err(|e| PaymentError::Config(format!("invalid process URL: {e}")))?;

        tracing::info!(
            agency_id = %request.agency.id,
            plan = %request.plan,
            sandbox = self.config.sandbox,
            "Created PayFast checkout"
        );

        Ok(CheckoutSession {
            payment_url: payment_url.to_string(),
            reference: reference.to_string(),
            plan: reference.plan,
        })
    }
}

/// Request to start a subscription payment
#[derive(Clone, Debug)]
pub struct CheckoutRequest<'a> {
    /// Paying admin
    pub user: &'a User,
    /// Agency being subscribed
    pub agency: &'a Agency,
    pub plan: SubscriptionPlan,
}

impl CheckoutRequest<'_> {
    pub fn reference(&self) -> PaymentReference {
        PaymentReference::new(self.agency.id.clone(), self.plan)
    }
}

/// Result of creating a checkout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// URL to redirect the user to
    pub payment_url: String,
    /// Composite payment reference (`m_payment_id`)
    pub reference: String,
    pub plan: SubscriptionPlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_core::Branding;
    use std::collections::BTreeMap;

    fn payfast() -> PayFast {
        PayFast::new(PayFastConfig::new(
            "10000100",
            "46f0cd694581a",
            "jt7NOE43FZPn",
            "https://agencyhub.co.za",
        ))
    }

    fn fixtures() -> (User, Agency) {
        let user = User::new("Thandi van der Merwe", "thandi@example.com");
        let agency = Agency::new("Coastal Homes", "coastal", Branding::default());
        (user, agency)
    }

    #[test]
    fn test_checkout_fields() {
        let (user, agency) = fixtures();
        let request = CheckoutRequest { user: &user, agency: &agency, plan: SubscriptionPlan::Pro };
        let fields: BTreeMap<_, _> = payfast().checkout_fields(&request).into_iter().collect();

        assert_eq!(fields["name_first"], "Thandi");
        assert_eq!(fields["name_last"], "van der Merwe");
        assert_eq!(fields["amount"], "199.00");
        assert_eq!(fields["item_name"], "Pro Plan Subscription");
        assert_eq!(fields["m_payment_id"], format!("{}-pro", agency.id));
        assert_eq!(fields["custom_str1"], agency.id.to_string());
        assert_eq!(fields["custom_str2"], "pro");
        assert_eq!(fields["notify_url"], "https://agencyhub.co.za/api/subscription/notify");
    }

    #[test]
    fn test_payment_url_carries_valid_signature() {
        let (user, agency) = fixtures();
        let request = CheckoutRequest { user: &user, agency: &agency, plan: SubscriptionPlan::Basic };
        let session = payfast().checkout(&request).unwrap();

        let url = Url::parse(&session.payment_url).unwrap();
        assert_eq!(url.host_str(), Some("sandbox.payfast.co.za"));
        assert_eq!(url.path(), "/eng/process");

        let mut pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
        let supplied = pairs.remove("signature").unwrap();
        assert!(signature::verify(&pairs, "jt7NOE43FZPn", &supplied));
        assert_eq!(pairs["amount"], "99.00");
        assert_eq!(session.reference, format!("{}-basic", agency.id));
        assert_eq!(pairs["m_payment_id"], session.reference);
        assert_eq!(
            PaymentReference::parse(&session.reference).unwrap(),
            request.reference()
        );
    }
}
