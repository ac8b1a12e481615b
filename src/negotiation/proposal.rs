use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{JobId, ProfileId, ProposalId};
use crate::error::{self, ValidationError};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ProposalStatus {
    /// Accepted, rejected and withdrawn absorb; only pending moves.
    pub fn is_terminal(self) -> bool {
        self != ProposalStatus::Pending
    }

    pub fn can_become(self, next: ProposalStatus) -> bool {
        self == ProposalStatus::Pending && next != ProposalStatus::Pending
    }
}

impl Display for ProposalStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ProposalStatus::Pending => write!(f, "pending"),
            ProposalStatus::Accepted => write!(f, "accepted"),
            ProposalStatus::Rejected => write!(f, "rejected"),
            ProposalStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
}

/// A professional's bid against a job.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub job_id: JobId,
    pub pro_profile_id: ProfileId,
    pub cover_letter: String,
    #[serde(default)]
    pub proposed_price: Option<f64>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub estimated_duration_unit: Option<DurationUnit>,
    pub status: ProposalStatus,
    pub contact_revealed: bool,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Accepting is only defined from `pending`.
    pub fn can_accept(&self) -> bool {
        self.status == ProposalStatus::Pending
    }

    /// Contact reveal is allowed while pending or accepted; rejected and
    /// withdrawn proposals are forbidden rather than silently ignored.
    pub fn can_reveal_contact(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Pending | ProposalStatus::Accepted
        )
    }
}

/// A draft proposal as filled in by a professional, validated before any
/// network call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposal {
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_unit: Option<DurationUnit>,
}

impl CreateProposal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cover_letter.trim().is_empty() {
            return Err(error::proposal_cover_letter_empty());
        }
        if let Some(price) = self.proposed_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(error::proposal_price_not_positive(price));
            }
        }
        Ok(())
    }
}
