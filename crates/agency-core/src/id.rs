//! Record Identifiers
//!
//! Every record id is a hyphen-free simple UUID, so ids can be embedded in
//! `-` separated composites (payment references) without ambiguity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh id
            pub fn new() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(
    /// Agency (tenant) identifier
    AgencyId
);
record_id!(
    /// User identifier
    UserId
);
record_id!(
    /// Lead identifier
    LeadId
);
record_id!(
    /// Affiliate agent identifier
    AgentId
);
record_id!(
    /// Invitation identifier
    InvitationId
);
record_id!(
    /// Commission identifier
    CommissionId
);
