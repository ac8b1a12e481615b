use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{JobId, OptionId, PollId, ProfileId};
use crate::error::{self, ValidationError};

pub const OPTION_LIMITS: RangeInclusive<usize> = 2..=6;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Active,
    Approved,
    Closed,
}

impl PollStatus {
    /// Approved and closed absorb; only active moves.
    pub fn is_terminal(self) -> bool {
        self != PollStatus::Active
    }

    pub fn can_become(self, next: PollStatus) -> bool {
        self == PollStatus::Active && next != PollStatus::Active
    }
}

impl Display for PollStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PollStatus::Active => write!(f, "active"),
            PollStatus::Approved => write!(f, "approved"),
            PollStatus::Closed => write!(f, "closed"),
        }
    }
}

/// What an option shows. At least one of text/image is always present;
/// the wire's two-optional-fields shape is rejected at parse time when
/// both are missing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OptionContent {
    Text(String),
    Image(String),
    TextAndImage { text: String, image_url: String },
}

impl OptionContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            OptionContent::Text(text) => Some(text),
            OptionContent::Image(_) => None,
            OptionContent::TextAndImage { text, .. } => Some(text),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            OptionContent::Text(_) => None,
            OptionContent::Image(url) => Some(url),
            OptionContent::TextAndImage { image_url, .. } => Some(image_url),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOption {
    id: OptionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "WireOption", into = "WireOption")]
pub struct PollOption {
    pub id: OptionId,
    pub content: OptionContent,
}

impl TryFrom<WireOption> for PollOption {
    type Error = ValidationError;

    fn try_from(wire: WireOption) -> Result<PollOption, ValidationError> {
        let text = wire.text.filter(|t| !t.trim().is_empty());
        let content = match (text, wire.image_url) {
            (Some(text), Some(image_url)) => OptionContent::TextAndImage { text, image_url },
            (Some(text), None) => OptionContent::Text(text),
            (None, Some(url)) => OptionContent::Image(url),
            (None, None) => return Err(error::poll_option_content_missing(wire.id.as_str())),
        };
        Ok(PollOption {
            id: wire.id,
            content,
        })
    }
}

impl From<PollOption> for WireOption {
    fn from(option: PollOption) -> WireOption {
        WireOption {
            id: option.id,
            text: option.content.text().map(String::from),
            image_url: option.content.image_url().map(String::from),
        }
    }
}

/// A multi-option decision request a professional poses to the client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: PollId,
    pub job_id: JobId,
    pub created_by: ProfileId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub options: Vec<PollOption>,
    pub status: PollStatus,
    /// Set exactly once, when the poll is approved.
    #[serde(default)]
    pub selected_option: Option<OptionId>,
    /// The client's current choice; may differ from `selected_option`
    /// until approval.
    #[serde(default)]
    pub client_vote: Option<OptionId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Poll {
    pub fn is_active(&self) -> bool {
        self.status == PollStatus::Active
    }

    pub fn has_option(&self, id: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == id)
    }

    /// Layout switches to the image grid when any option carries an image.
    pub fn uses_image_layout(&self) -> bool {
        self.options.iter().any(|o| o.content.image_url().is_some())
    }

    /// An option can be clicked iff the poll is active, the viewer is the
    /// client, and no request is currently in flight for this poll.
    pub fn option_selectable(&self, viewer_is_client: bool, in_flight: bool) -> bool {
        self.is_active() && viewer_is_client && !in_flight
    }

    /// The approved answer. Distinct from a mere pending vote.
    pub fn option_is_answer(&self, id: &OptionId) -> bool {
        self.status == PollStatus::Approved && self.selected_option.as_ref() == Some(id)
    }

    /// Selected by the client but not yet committed by approval.
    pub fn option_is_pending_choice(&self, id: &OptionId) -> bool {
        self.status != PollStatus::Approved && self.client_vote.as_ref() == Some(id)
    }
}

/// A poll draft as composed by a professional. Options may be incomplete
/// while the form is being filled in; `validate` decides usability right
/// before submission.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoll {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<CreateOption>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CreateOption {
    pub fn usable(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self.image_url.is_some()
    }
}

impl CreatePoll {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(error::poll_title_empty());
        }
        if let Some(index) = self.options.iter().position(|o| !o.usable()) {
            return Err(error::poll_option_unusable(index));
        }
        if !OPTION_LIMITS.contains(&self.options.len()) {
            return Err(error::poll_option_limit_exceeded(
                OPTION_LIMITS,
                self.options.len(),
            ));
        }
        Ok(())
    }
}
