//! Decision values recorded by each actor in the hiring pipeline.
//!
//! Decisions are persisted as upper-case text and exchanged over the wire in
//! the same form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raised when stored or submitted text is not a known decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} decision: {value}")]
pub struct UnknownDecision {
    kind: &'static str,
    value: String,
}

macro_rules! decision {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$variant_meta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Stored text form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownDecision;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownDecision {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

decision! {
    /// Supervisor or HR approval of a requisition.
    ApprovalDecision ("approval") {
        /// No decision yet.
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

decision! {
    /// Recruiter screening outcome.
    RecruiterDecision ("recruiter") {
        Shortlisted => "SHORTLISTED",
        Rejected => "REJECTED",
    }
}

decision! {
    /// Hiring manager outcome after the interview.
    HiringManagerDecision ("hiring manager") {
        Offered => "OFFERED",
        Rejected => "REJECTED",
    }
}

decision! {
    /// Applicant response to an offer.
    ApplicantDecision ("applicant") {
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
    }
}

impl ApprovalDecision {
    /// Whether the approver has acted.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}
