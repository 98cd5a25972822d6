//! Strongly typed identifiers for tenant-scoped records.
//!
//! Every identifier is a UUID underneath; the newtypes stop a supervisor id
//! from being passed where a requisition id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Borrow the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_identifier! {
    /// Tenant owning every other record.
    TenantId
}

uuid_identifier! {
    /// User account within a tenant.
    UserId
}

uuid_identifier! {
    /// Top-level organisational unit.
    DivisionId
}

uuid_identifier! {
    /// Organisational unit inside a division.
    DepartmentId
}

uuid_identifier! {
    /// Position inside a department.
    PositionId
}

uuid_identifier! {
    /// Request to fill a position.
    JobRequisitionId
}

uuid_identifier! {
    /// One applicant's candidacy for a requisition.
    JobApplicationId
}
