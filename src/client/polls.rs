use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::api::MarketplaceApi;
use crate::error::{self, WorkflowError};
use crate::negotiation::{Actor, CreatePoll, Job, JobId, OptionId, Poll, PollId, PollStatus};

/// Lifecycle of a job's decision polls. Voting is the one optimistic
/// operation in the whole workflow (cheap, frequent, reversible, no
/// cross-entity side effects); everything else confirms with the server
/// before the cache moves.
pub struct PollWorkflow<A> {
    api: Arc<A>,
    actor: Actor,
    cache: HashMap<JobId, Vec<Poll>>,
    in_flight: HashSet<PollId>,
    viewed_marked: HashSet<JobId>,
}

impl<A: MarketplaceApi> PollWorkflow<A> {
    pub fn new(api: Arc<A>, actor: Actor) -> PollWorkflow<A> {
        PollWorkflow {
            api,
            actor,
            cache: HashMap::new(),
            in_flight: HashSet::new(),
            viewed_marked: HashSet::new(),
        }
    }

    pub fn cached(&self, job: &JobId) -> Option<&[Poll]> {
        self.cache.get(job).map(Vec::as_slice)
    }

    pub fn is_in_flight(&self, poll: &PollId) -> bool {
        self.in_flight.contains(poll)
    }

    /// Fetches the job's polls on first expansion, cached thereafter. The
    /// first fetch also fires the best-effort "polls viewed" signal; its
    /// failure is logged and swallowed, never surfaced.
    pub async fn list(&mut self, job: &JobId) -> Result<&[Poll], WorkflowError> {
        if !self.cache.contains_key(job) {
            debug!(job = %job, "fetching polls");
            let polls = self.api.list_polls(job).await?;
            self.cache.insert(job.clone(), polls);

            if self.viewed_marked.insert(job.clone()) {
                if let Err(err) = self.api.mark_polls_viewed(job).await {
                    warn!(job = %job, error = %err, "mark-polls-viewed failed, ignoring");
                }
            }
        }
        Ok(self.cache.get(job).map(Vec::as_slice).unwrap_or_default())
    }

    pub fn invalidate(&mut self, job: &JobId) {
        self.cache.remove(job);
    }

    /// Professional-side creation. Validated locally; on success the
    /// server's record (not the local draft) is prepended to the list.
    pub async fn create(&mut self, job: &JobId, draft: &CreatePoll) -> Result<(), WorkflowError> {
        if !self.actor.is_professional() {
            return Err(error::not_professional("create a poll").into());
        }
        draft.validate()?;

        debug!(job = %job, title = %draft.title, "creating poll");
        let created = self.api.create_poll(job, draft).await?;
        self.cache.entry(job.clone()).or_default().insert(0, created);
        Ok(())
    }

    /// Client vote: applied optimistically so the selection shows without
    /// delay, rolled back to the prior value if the server refuses.
    pub async fn vote(
        &mut self,
        job: &Job,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<(), WorkflowError> {
        if !self.actor.owns_job(job) {
            return Err(error::not_job_owner("vote on a poll").into());
        }
        let index = self.find(&job.id, poll)?;
        {
            let found = &self.cache[&job.id][index];
            if !found.is_active() {
                return Err(error::poll_not_active(poll, found.status).into());
            }
            if !found.has_option(option) {
                return Err(error::unknown_entity("option", option.as_str()).into());
            }
        }

        self.guard(poll)?;
        let entry = &mut self.cache.get_mut(&job.id).unwrap()[index];
        let previous = entry.client_vote.replace(option.clone());

        debug!(poll = %poll, option = %option, "voting");
        let result = self.api.vote(poll, option).await;
        self.in_flight.remove(poll);

        if let Err(err) = result {
            // snapshot rollback: the cache returns to its pre-attempt value
            let entry = &mut self.cache.get_mut(&job.id).unwrap()[index];
            entry.client_vote = previous;
            return Err(err.into());
        }
        Ok(())
    }

    /// Client approval of the voted option. Deliberate and rare, so it is
    /// confirm-then-patch: a failure leaves the poll untouched rather than
    /// silently reverting an applied state.
    pub async fn approve(
        &mut self,
        job: &Job,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<(), WorkflowError> {
        if !self.actor.owns_job(job) {
            return Err(error::not_job_owner("approve a poll").into());
        }
        let index = self.find(&job.id, poll)?;
        {
            let found = &self.cache[&job.id][index];
            if !found.is_active() {
                return Err(error::poll_not_active(poll, found.status).into());
            }
            if found.client_vote.is_none() {
                return Err(error::approve_requires_vote(poll).into());
            }
            if !found.has_option(option) {
                return Err(error::unknown_entity("option", option.as_str()).into());
            }
        }

        self.guard(poll)?;
        debug!(poll = %poll, option = %option, "approving poll");
        let result = self.api.approve(poll, option).await;
        self.in_flight.remove(poll);
        result?;

        let entry = &mut self.cache.get_mut(&job.id).unwrap()[index];
        entry.status = PollStatus::Approved;
        entry.selected_option = Some(option.clone());
        Ok(())
    }

    /// Creator closes an active poll without approval. Confirm-then-patch.
    pub async fn close(&mut self, job: &JobId, poll: &PollId) -> Result<(), WorkflowError> {
        let index = self.find(job, poll)?;
        {
            let found = &self.cache[job][index];
            if !self.actor.created_poll(found) {
                return Err(error::not_poll_creator("close it").into());
            }
            if !found.is_active() {
                return Err(error::poll_not_active(poll, found.status).into());
            }
        }

        self.guard(poll)?;
        debug!(poll = %poll, "closing poll");
        let result = self.api.close_poll(poll).await;
        self.in_flight.remove(poll);
        result?;

        let entry = &mut self.cache.get_mut(job).unwrap()[index];
        entry.status = PollStatus::Closed;
        entry.closed_at = Some(Utc::now());
        Ok(())
    }

    /// Creator deletes a poll. The record leaves the local list only after
    /// the server has confirmed.
    pub async fn delete(&mut self, job: &JobId, poll: &PollId) -> Result<(), WorkflowError> {
        let index = self.find(job, poll)?;
        if !self.actor.created_poll(&self.cache[job][index]) {
            return Err(error::not_poll_creator("delete it").into());
        }

        self.guard(poll)?;
        debug!(poll = %poll, "deleting poll");
        let result = self.api.delete_poll(poll).await;
        self.in_flight.remove(poll);
        result?;

        self.cache.get_mut(job).unwrap().remove(index);
        Ok(())
    }

    fn find(&self, job: &JobId, poll: &PollId) -> Result<usize, WorkflowError> {
        self.cache
            .get(job)
            .and_then(|list| list.iter().position(|p| &p.id == poll))
            .ok_or_else(|| error::unknown_entity("poll", poll.as_str()).into())
    }

    fn guard(&mut self, poll: &PollId) -> Result<(), WorkflowError> {
        if !self.in_flight.insert(poll.clone()) {
            return Err(error::entity_busy(poll.as_str()).into());
        }
        Ok(())
    }
}
