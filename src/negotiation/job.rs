use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{JobId, ProfileId};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            JobStatus::Open => write!(f, "open"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A posted work request, owned by one client. Created and mutated by the
/// server; the client only ever re-fetches it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub client_id: ProfileId,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub status: JobStatus,
    /// Denormalized, server-maintained. Displayed as-is, never recomputed
    /// from the locally cached proposal list.
    #[serde(default)]
    pub proposal_count: Option<f64>,
    #[serde(default)]
    pub view_count: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Count safe to put on a badge: absent, negative, and NaN all
    /// collapse to zero.
    pub fn proposal_badge(&self) -> u32 {
        sanitize_count(self.proposal_count)
    }

    pub fn view_badge(&self) -> u32 {
        sanitize_count(self.view_count)
    }

    /// The client-side list filter: status match plus case-insensitive
    /// substring match over title/category/location. Pure, no network.
    pub fn matches(&self, filter: &JobFilter) -> bool {
        if let Some(status) = filter.status {
            if self.status != status {
                return false;
            }
        }
        let needle = filter.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let mut haystacks = vec![self.title.as_str()];
        haystacks.extend(self.category.as_deref());
        haystacks.extend(self.location.as_deref());
        haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
    }
}

fn sanitize_count(raw: Option<f64>) -> u32 {
    match raw {
        Some(n) if n.is_finite() && n > 0.0 => n as u32,
        _ => 0,
    }
}

#[derive(Clone, Debug, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub query: String,
}
