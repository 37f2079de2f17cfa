//! Application State

use std::sync::Arc;

use agency_core::{
    AgencyService, CallerResolver, Mailer, SessionIssuer, Store, SubdomainProvisioner,
};
use agency_payments::{NotificationHandler, PayFast};

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tenant workflows (store, provisioning, mail)
    pub service: AgencyService,

    /// Session oracle for authenticated routes
    pub sessions: Arc<dyn CallerResolver>,

    /// Issues tokens on signup
    pub issuer: Arc<dyn SessionIssuer>,

    /// PayFast client (optional - None if not configured)
    pub payfast: Option<Arc<PayFast>>,

    /// Applies verified payment notifications
    pub notifications: Arc<NotificationHandler<dyn Store>>,
}

impl AppState {
    pub fn new<T>(
        config: &AppConfig,
        store: Arc<dyn Store>,
        sessions: Arc<T>,
        provisioner: Arc<dyn SubdomainProvisioner>,
        mailer: Arc<dyn Mailer>,
        payfast: Option<PayFast>,
    ) -> Self
    where
        T: CallerResolver + SessionIssuer + 'static,
    {
        let notifications =
            NotificationHandler::new(store.clone()).with_renewal_window(config.renewal_window());

        Self {
            service: AgencyService::new(store, provisioner, mailer, config.service_settings()),
            sessions: sessions.clone(),
            issuer: sessions,
            payfast: payfast.map(Arc::new),
            notifications: Arc::new(notifications),
        }
    }
}
