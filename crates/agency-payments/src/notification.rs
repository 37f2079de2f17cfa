//! Payment Notifications
//!
//! An inbound notification is untrusted until [`PaymentNotification::verify`]
//! turns it into a [`VerifiedNotification`]. Only verified notifications
//! reach the subscription applier.

use std::collections::BTreeMap;

use agency_core::AgencyId;

use crate::error::{PaymentError, Result};
use crate::reference::{AGENCY_FIELD, PLAN_FIELD, PaymentReference, REFERENCE_FIELD};
use crate::signature::{self, SIGNATURE_FIELD};

const STATUS_FIELD: &str = "payment_status";

/// Provider payment status
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Complete,
    Pending,
    Failed,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "COMPLETE" => PaymentStatus::Complete,
            "PENDING" => PaymentStatus::Pending,
            "FAILED" => PaymentStatus::Failed,
            "CANCELLED" => PaymentStatus::Cancelled,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PaymentStatus::Complete)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Complete => f.write_str("COMPLETE"),
            PaymentStatus::Pending => f.write_str("PENDING"),
            PaymentStatus::Failed => f.write_str("FAILED"),
            PaymentStatus::Cancelled => f.write_str("CANCELLED"),
            PaymentStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// Unverified form fields plus the detached signature
#[derive(Clone, Debug)]
pub struct PaymentNotification {
    fields: BTreeMap<String, String>,
    signature: String,
}

impl PaymentNotification {
    /// Split the signature off a decoded form body
    pub fn from_form<I>(form: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields: BTreeMap<String, String> = form.into_iter().collect();
        let signature = fields
            .remove(SIGNATURE_FIELD)
            .ok_or(PaymentError::MissingField(SIGNATURE_FIELD))?;

        Ok(Self { fields, signature })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Check the signature against the passphrase
    pub fn verify(self, passphrase: &str) -> Result<VerifiedNotification> {
        if !signature::verify(&self.fields, passphrase, &self.signature) {
            return Err(PaymentError::SignatureMismatch);
        }
        Ok(VerifiedNotification { fields: self.fields })
    }
}

/// A notification whose signature has been checked
#[derive(Clone, Debug)]
pub struct VerifiedNotification {
    fields: BTreeMap<String, String>,
}

impl VerifiedNotification {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn require(&self, name: &'static str) -> Result<&str> {
        self.field(name).ok_or(PaymentError::MissingField(name))
    }

    /// Agency and plan this payment was for
    pub fn reference(&self) -> Result<PaymentReference> {
        PaymentReference::from_fields(
            self.require(REFERENCE_FIELD)?,
            self.field(AGENCY_FIELD),
            self.field(PLAN_FIELD),
        )
    }

    /// Agency this payment was for, whatever the plan says
    pub fn agency_id(&self) -> Result<AgencyId> {
        PaymentReference::agency_from_fields(
            self.require(REFERENCE_FIELD)?,
            self.field(AGENCY_FIELD),
            self.field(PLAN_FIELD),
        )
    }

    pub fn status(&self) -> Result<PaymentStatus> {
        self.require(STATUS_FIELD).map(PaymentStatus::parse)
    }
}
