use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::api::MarketplaceApi;
use crate::error::{self, ApiError};
use crate::negotiation::{
    CreatePoll, CreateProposal, Job, JobId, JobStatus, OptionContent, OptionId, Poll, PollId,
    PollOption, PollStatus, ProfileId, Proposal, ProposalId, ProposalStatus,
};

#[derive(Default)]
struct State {
    jobs: Vec<Job>,
    proposals: HashMap<JobId, Vec<Proposal>>,
    polls: HashMap<JobId, Vec<Poll>>,
    calls: HashMap<&'static str, usize>,
    failures: HashSet<&'static str>,
}

/// In-memory marketplace standing in for the real server in unit tests.
/// Mimics the server-side side effects the client is not allowed to
/// predict: accepting a proposal rejects its siblings and moves the job
/// along, approving a poll records the selected option, and so on.
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> FakeApi {
        FakeApi {
            state: Mutex::new(State::default()),
        }
    }

    pub fn seed_jobs(&self, jobs: Vec<Job>) {
        self.state.lock().unwrap().jobs = jobs;
    }

    pub fn seed_proposals(&self, job: &str, proposals: Vec<Proposal>) {
        self.state
            .lock()
            .unwrap()
            .proposals
            .insert(JobId::from(job), proposals);
    }

    pub fn seed_polls(&self, job: &str, polls: Vec<Poll>) {
        self.state
            .lock()
            .unwrap()
            .polls
            .insert(JobId::from(job), polls);
    }

    /// Makes the next invocation of the named operation fail server-side.
    pub fn fail_next(&self, operation: &'static str) {
        self.state.lock().unwrap().failures.insert(operation);
    }

    pub fn calls(&self, operation: &str) -> usize {
        *self
            .state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .unwrap_or(&0)
    }

    fn begin(&self, operation: &'static str) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_insert(0) += 1;
        if state.failures.remove(operation) {
            return Err(error::api_failure(operation));
        }
        Ok(state)
    }
}

impl MarketplaceApi for FakeApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let state = self.begin("list_jobs")?;
        Ok(state.jobs.clone())
    }

    async fn list_proposals(&self, job: &JobId) -> Result<Vec<Proposal>, ApiError> {
        let state = self.begin("list_proposals")?;
        Ok(state.proposals.get(job).cloned().unwrap_or_default())
    }

    async fn submit_proposal(
        &self,
        job: &JobId,
        draft: &CreateProposal,
    ) -> Result<Proposal, ApiError> {
        let mut state = self.begin("submit_proposal")?;
        let created = Proposal {
            id: ProposalId::new(Uuid::new_v4().to_string()),
            job_id: job.clone(),
            pro_profile_id: ProfileId::from("pro1"),
            cover_letter: draft.cover_letter.clone(),
            proposed_price: draft.proposed_price,
            estimated_duration: draft.estimated_duration,
            estimated_duration_unit: draft.estimated_duration_unit,
            status: ProposalStatus::Pending,
            contact_revealed: false,
            created_at: Utc::now(),
        };
        state
            .proposals
            .entry(job.clone())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn accept_proposal(&self, proposal: &ProposalId) -> Result<(), ApiError> {
        let mut state = self.begin("accept_proposal")?;
        let mut accepted_job = None;
        for (job, list) in state.proposals.iter_mut() {
            if list.iter().any(|p| &p.id == proposal) {
                for p in list.iter_mut() {
                    if &p.id == proposal {
                        p.status = ProposalStatus::Accepted;
                    } else if p.status == ProposalStatus::Pending {
                        p.status = ProposalStatus::Rejected;
                    }
                }
                accepted_job = Some(job.clone());
            }
        }
        if let Some(job) = accepted_job {
            for j in state.jobs.iter_mut() {
                if j.id == job && j.status == JobStatus::Open {
                    j.status = JobStatus::InProgress;
                }
            }
        }
        Ok(())
    }

    async fn reveal_contact(&self, proposal: &ProposalId) -> Result<(), ApiError> {
        let mut state = self.begin("reveal_contact")?;
        for list in state.proposals.values_mut() {
            for p in list.iter_mut() {
                if &p.id == proposal {
                    p.contact_revealed = true;
                }
            }
        }
        Ok(())
    }

    async fn list_polls(&self, job: &JobId) -> Result<Vec<Poll>, ApiError> {
        let state = self.begin("list_polls")?;
        Ok(state.polls.get(job).cloned().unwrap_or_default())
    }

    async fn create_poll(&self, job: &JobId, draft: &CreatePoll) -> Result<Poll, ApiError> {
        let mut state = self.begin("create_poll")?;
        let options = draft
            .options
            .iter()
            .map(|o| {
                let text = o.text.clone().filter(|t| !t.trim().is_empty());
                let content = match (text, o.image_url.clone()) {
                    (Some(text), Some(image_url)) => OptionContent::TextAndImage { text, image_url },
                    (Some(text), None) => OptionContent::Text(text),
                    (None, Some(url)) => OptionContent::Image(url),
                    (None, None) => OptionContent::Text(String::new()),
                };
                PollOption {
                    id: OptionId::new(Uuid::new_v4().to_string()),
                    content,
                }
            })
            .collect();
        let created = Poll {
            id: PollId::new(Uuid::new_v4().to_string()),
            job_id: job.clone(),
            created_by: ProfileId::from("pro1"),
            title: draft.title.clone(),
            description: draft.description.clone(),
            options,
            status: PollStatus::Active,
            selected_option: None,
            client_vote: None,
            created_at: Utc::now(),
            closed_at: None,
        };
        state
            .polls
            .entry(job.clone())
            .or_default()
            .insert(0, created.clone());
        Ok(created)
    }

    async fn vote(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError> {
        let mut state = self.begin("vote")?;
        for list in state.polls.values_mut() {
            for p in list.iter_mut() {
                if &p.id == poll {
                    p.client_vote = Some(option.clone());
                }
            }
        }
        Ok(())
    }

    async fn approve(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError> {
        let mut state = self.begin("approve")?;
        for list in state.polls.values_mut() {
            for p in list.iter_mut() {
                if &p.id == poll {
                    p.status = PollStatus::Approved;
                    p.selected_option = Some(option.clone());
                }
            }
        }
        Ok(())
    }

    async fn close_poll(&self, poll: &PollId) -> Result<(), ApiError> {
        let mut state = self.begin("close_poll")?;
        for list in state.polls.values_mut() {
            for p in list.iter_mut() {
                if &p.id == poll {
                    p.status = PollStatus::Closed;
                    p.closed_at = Some(Utc::now());
                }
            }
        }
        Ok(())
    }

    async fn delete_poll(&self, poll: &PollId) -> Result<(), ApiError> {
        let mut state = self.begin("delete_poll")?;
        for list in state.polls.values_mut() {
            list.retain(|p| &p.id != poll);
        }
        Ok(())
    }

    async fn mark_polls_viewed(&self, job: &JobId) -> Result<(), ApiError> {
        let _ = job;
        self.begin("mark_polls_viewed")?;
        Ok(())
    }
}
