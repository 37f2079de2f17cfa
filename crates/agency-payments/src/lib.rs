//! # agency-payments
//!
//! PayFast subscription payments for agency-hub.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────────────┐
//! │  Dashboard   │────▶│  PayFast Hosted │────▶│  POST /notify (ITN)  │
//! │ (pick plan)  │     │  Payment Page   │     │  verify + apply      │
//! └──────────────┘     └─────────────────┘     └──────────────────────┘
//! ```
//!
//! 1. [`PayFast::checkout`] signs the field set and returns the redirect URL.
//!    `m_payment_id` carries `{agency_id}-{plan}`.
//! 2. PayFast posts the payment outcome as a form to the notify URL.
//! 3. [`NotificationHandler::parse_notification`] recomputes the signature;
//!    a mismatch is rejected before anything else happens.
//! 4. [`NotificationHandler::handle`] activates the plan for 30 days when the
//!    status is `COMPLETE` and ignores every other status.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agency_payments::{NotificationHandler, PayFast};
//!
//! let payfast = PayFast::from_env("https://agencyhub.co.za")?;
//! let handler = NotificationHandler::new(store);
//!
//! let notification = handler.parse_notification(form, payfast.passphrase())?;
//! handler.handle(&notification).await?;
//! ```

mod checkout;
mod config;
mod error;
mod notification;
mod reference;
pub mod signature;
mod webhook;

pub use checkout::{CheckoutRequest, CheckoutSession, PayFast};
pub use config::PayFastConfig;
pub use error::{PaymentError, Result};
pub use notification::{PaymentNotification, PaymentStatus, VerifiedNotification};
pub use reference::PaymentReference;
pub use webhook::{DEFAULT_RENEWAL_DAYS, NotificationHandler, NotificationOutcome};
