use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::api::MarketplaceApi;
use crate::error::{self, WorkflowError};
use crate::negotiation::{Actor, CreateProposal, Job, JobId, Proposal, ProposalId};

/// Client-side view of one job's proposals, plus the two mutations a job
/// owner may perform against them. Both mutations are confirm-then-refresh:
/// nothing is applied locally until the server has answered, and the
/// authoritative list is re-fetched afterwards because accepting a proposal
/// has side effects on the job and on sibling proposals that the client
/// cannot reliably predict.
pub struct ProposalWorkflow<A> {
    api: Arc<A>,
    actor: Actor,
    cache: HashMap<JobId, Vec<Proposal>>,
    in_flight: HashSet<ProposalId>,
}

impl<A: MarketplaceApi> ProposalWorkflow<A> {
    pub fn new(api: Arc<A>, actor: Actor) -> ProposalWorkflow<A> {
        ProposalWorkflow {
            api,
            actor,
            cache: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn cached(&self, job: &JobId) -> Option<&[Proposal]> {
        self.cache.get(job).map(Vec::as_slice)
    }

    pub fn is_in_flight(&self, proposal: &ProposalId) -> bool {
        self.in_flight.contains(proposal)
    }

    /// Fetches the job's proposals on first call; cached thereafter until a
    /// mutation invalidates. Server order is kept verbatim.
    pub async fn list(&mut self, job: &JobId) -> Result<&[Proposal], WorkflowError> {
        if !self.cache.contains_key(job) {
            debug!(job = %job, "fetching proposals");
            let proposals = self.api.list_proposals(job).await?;
            self.cache.insert(job.clone(), proposals);
        }
        Ok(self.cache.get(job).map(Vec::as_slice).unwrap_or_default())
    }

    pub fn invalidate(&mut self, job: &JobId) {
        self.cache.remove(job);
    }

    /// Requests `pending → accepted`. Only the job's owning client, only
    /// while the proposal is pending, one request per proposal at a time.
    pub async fn accept(&mut self, job: &Job, proposal: &ProposalId) -> Result<(), WorkflowError> {
        if !self.actor.owns_job(job) {
            return Err(error::not_job_owner("accept a proposal").into());
        }
        let found = self.find(&job.id, proposal)?;
        if !found.can_accept() {
            return Err(error::proposal_not_pending(proposal, found.status).into());
        }

        self.guard(proposal)?;
        debug!(proposal = %proposal, "accepting proposal");
        let result = self.api.accept_proposal(proposal).await;
        self.in_flight.remove(proposal);
        result?;

        self.refresh(&job.id).await
    }

    /// Requests `contact_revealed = true`. Forbidden once the proposal is
    /// rejected or withdrawn; re-revealing an already revealed proposal is
    /// a harmless confirm.
    pub async fn reveal_contact(
        &mut self,
        job: &Job,
        proposal: &ProposalId,
    ) -> Result<(), WorkflowError> {
        if !self.actor.owns_job(job) {
            return Err(error::not_job_owner("reveal a proposal's contact").into());
        }
        let found = self.find(&job.id, proposal)?;
        if !found.can_reveal_contact() {
            return Err(error::proposal_not_revealable(proposal, found.status).into());
        }

        self.guard(proposal)?;
        debug!(proposal = %proposal, "revealing contact");
        let result = self.api.reveal_contact(proposal).await;
        self.in_flight.remove(proposal);
        result?;

        self.refresh(&job.id).await
    }

    /// Professional-side submission of a new bid. Validated locally before
    /// any network call; the job's cached list is dropped so the next
    /// expansion sees the authoritative set.
    pub async fn submit(
        &mut self,
        job: &JobId,
        draft: &CreateProposal,
    ) -> Result<Proposal, WorkflowError> {
        if !self.actor.is_professional() {
            return Err(error::not_professional("submit a proposal").into());
        }
        draft.validate()?;

        debug!(job = %job, "submitting proposal");
        let created = self.api.submit_proposal(job, draft).await?;
        self.cache.remove(job);
        Ok(created)
    }

    fn find(&self, job: &JobId, proposal: &ProposalId) -> Result<&Proposal, WorkflowError> {
        self.cache
            .get(job)
            .and_then(|list| list.iter().find(|p| &p.id == proposal))
            .ok_or_else(|| error::unknown_entity("proposal", proposal.as_str()).into())
    }

    fn guard(&mut self, proposal: &ProposalId) -> Result<(), WorkflowError> {
        if !self.in_flight.insert(proposal.clone()) {
            return Err(error::entity_busy(proposal.as_str()).into());
        }
        Ok(())
    }

    /// Replaces the cached list with the server's. A failed refresh drops
    /// the stale entry instead; the next expansion re-fetches.
    async fn refresh(&mut self, job: &JobId) -> Result<(), WorkflowError> {
        match self.api.list_proposals(job).await {
            Ok(proposals) => {
                self.cache.insert(job.clone(), proposals);
                Ok(())
            }
            Err(err) => {
                self.cache.remove(job);
                Err(err.into())
            }
        }
    }
}
