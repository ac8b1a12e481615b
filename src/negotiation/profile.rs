use serde::{Deserialize, Serialize};

use super::id::ProfileId;

/// A professional's public profile, as seen by a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProProfile {
    pub id: ProfileId,
    pub display_name: String,
    #[serde(default)]
    pub premium_tier: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ProProfile {
    /// Basic-tier professionals expose their phone number directly;
    /// elevated tiers route clients into in-app messaging instead.
    pub fn is_basic_tier(&self) -> bool {
        match self.premium_tier.as_deref() {
            None | Some("none") | Some("basic") => true,
            Some(_) => false,
        }
    }
}

/// What the profile page's contact button should do for this viewer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContactAction {
    /// Show the phone number inline. No server mutation involved; this is
    /// the profile-level reveal, unrelated to a proposal's
    /// `contact_revealed` flag.
    RevealPhone(String),
    /// Navigate into the in-app messaging flow with this professional.
    OpenMessaging(ProfileId),
}

/// Session-local gate for the profile page's contact button. The revealed
/// flag lives only as long as the page; nothing is persisted.
#[derive(Debug, Default)]
pub struct ContactGate {
    phone_revealed: bool,
}

impl ContactGate {
    pub fn new() -> ContactGate {
        ContactGate::default()
    }

    pub fn phone_revealed(&self) -> bool {
        self.phone_revealed
    }

    pub fn contact(&mut self, profile: &ProProfile) -> ContactAction {
        match (profile.is_basic_tier(), &profile.phone) {
            (true, Some(phone)) => {
                self.phone_revealed = true;
                ContactAction::RevealPhone(phone.clone())
            }
            // Basic tier without a stored phone still has to go through
            // messaging; there is nothing to reveal.
            _ => ContactAction::OpenMessaging(profile.id.clone()),
        }
    }
}
