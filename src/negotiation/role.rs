use serde::{Deserialize, Serialize};

use super::id::ProfileId;
use super::job::Job;
use super::poll::Poll;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Professional,
}

/// The authenticated identity a controller acts as. The view layer hides
/// disallowed controls, but every controller re-checks against this actor
/// so a stale or foreign surface cannot bypass the gate.
#[derive(Clone, Debug)]
pub struct Actor {
    pub profile_id: ProfileId,
    pub role: Role,
}

impl Actor {
    pub fn client(profile_id: impl Into<ProfileId>) -> Actor {
        Actor {
            profile_id: profile_id.into(),
            role: Role::Client,
        }
    }

    pub fn professional(profile_id: impl Into<ProfileId>) -> Actor {
        Actor {
            profile_id: profile_id.into(),
            role: Role::Professional,
        }
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }

    pub fn is_professional(&self) -> bool {
        self.role == Role::Professional
    }

    pub fn owns_job(&self, job: &Job) -> bool {
        self.is_client() && self.profile_id == job.client_id
    }

    pub fn created_poll(&self, poll: &Poll) -> bool {
        self.is_professional() && self.profile_id == poll.created_by
    }
}
