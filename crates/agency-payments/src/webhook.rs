//! PayFast Notification Handling
//!
//! Applies verified payment notifications to the agency's subscription.

use agency_core::{AgencyId, AgencyStore, SubscriptionChange, SubscriptionPlan};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::error::{PaymentError, Result};
use crate::notification::{PaymentNotification, PaymentStatus, VerifiedNotification};

/// Days a completed payment keeps the subscription active
pub const DEFAULT_RENEWAL_DAYS: i64 = 30;

/// What a notification did to tenant state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Subscription activated (or renewed)
    Activated {
        agency_id: AgencyId,
        plan: SubscriptionPlan,
        expires_at: DateTime<Utc>,
    },

    /// Status was not `COMPLETE`; nothing changed
    Ignored {
        agency_id: AgencyId,
        status: PaymentStatus,
    },
}

/// Webhook handler
pub struct NotificationHandler<S: AgencyStore + ?Sized> {
    store: Arc<S>,
    renewal_window: Duration,
}

impl<S: AgencyStore + ?Sized> NotificationHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            renewal_window: Duration::days(DEFAULT_RENEWAL_DAYS),
        }
    }

    /// Override the renewal window
    pub fn with_renewal_window(mut self, window: Duration) -> Self {
        self.renewal_window = window;
        self
    }

    pub fn renewal_window(&self) -> Duration {
        self.renewal_window
    }

    /// Verify the signature on a decoded form body
    pub fn parse_notification<I>(&self, form: I, passphrase: &str) -> Result<VerifiedNotification>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        PaymentNotification::from_form(form)?
            .verify(passphrase)
            .inspect_err(|_| tracing::warn!("PayFast notification signature mismatch"))
    }

    /// Process a verified notification
    pub async fn handle(&self, notification: &VerifiedNotification) -> Result<NotificationOutcome> {
        self.handle_at(notification, Utc::now()).await
    }

    /// Process a verified notification as of `now`
    pub async fn handle_at(
        &self,
        notification: &VerifiedNotification,
        now: DateTime<Utc>,
    ) -> Result<NotificationOutcome> {
        let status = notification.status()?;
        let agency_id = notification.agency_id()?;

        tracing::info!(
            agency_id = %agency_id,
            status = %status,
            "Processing PayFast notification"
        );

        if !status.is_complete() {
            tracing::debug!(
                agency_id = %agency_id,
                status = %status,
                "Notification not complete; subscription unchanged"
            );
            return Ok(NotificationOutcome::Ignored { agency_id, status });
        }

        // plan is validated only for completed payments
        let reference = notification.reference()?;
        let change = SubscriptionChange::activate(reference.plan, now, self.renewal_window);
        let agency = self
            .store
            .apply_subscription(&reference.agency_id, &change)
            .await
            .map_err(PaymentError::from)
            .inspect_err(|e| {
                tracing::error!(agency_id = %reference.agency_id, error = %e, "Subscription update failed");
            })?;

        tracing::info!(
            agency_id = %agency.id,
            plan = %change.plan,
            expires_at = %change.expires_at,
            "Activated subscription"
        );

        Ok(NotificationOutcome::Activated {
            agency_id: agency.id,
            plan: change.plan,
            expires_at: change.expires_at,
        })
    }
}
