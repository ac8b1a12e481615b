use std::sync::Arc;

use tracing::{debug, warn};

use super::api::MarketplaceApi;
use super::polls::PollWorkflow;
use super::proposals::ProposalWorkflow;
use crate::error::{self, WorkflowError};
use crate::negotiation::{
    Actor, CreatePoll, Job, JobFilter, JobId, OptionId, Poll, PollId, Proposal, ProposalId,
};

/// The "my jobs" screen: a list of the actor's jobs, each lazily expandable
/// into its proposals and polls. The view never mutates records itself;
/// every mutation funnels through the two controllers, and cross-cutting
/// fields (badges, job status) are re-read from the job record the server
/// returns rather than recomputed from local caches.
pub struct JobsView<A> {
    api: Arc<A>,
    jobs: Vec<Job>,
    proposals: ProposalWorkflow<A>,
    polls: PollWorkflow<A>,
}

impl<A: MarketplaceApi> JobsView<A> {
    pub fn new(api: Arc<A>, actor: Actor) -> JobsView<A> {
        JobsView {
            api: api.clone(),
            jobs: vec![],
            proposals: ProposalWorkflow::new(api.clone(), actor.clone()),
            polls: PollWorkflow::new(api, actor),
        }
    }

    /// Re-fetches the job list. Independent of the per-job panels; their
    /// caches survive a job-list refresh.
    pub async fn refresh(&mut self) -> Result<&[Job], WorkflowError> {
        debug!("fetching job list");
        self.jobs = self.api.list_jobs().await?;
        Ok(&self.jobs)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| &j.id == id)
    }

    /// Pure client-side filtering, no network cost.
    pub fn filtered(&self, filter: &JobFilter) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.matches(filter)).collect()
    }

    pub fn proposal_in_flight(&self, proposal: &ProposalId) -> bool {
        self.proposals.is_in_flight(proposal)
    }

    pub fn poll_in_flight(&self, poll: &PollId) -> bool {
        self.polls.is_in_flight(poll)
    }

    /// First expansion fetches; later expansions serve the cache.
    pub async fn expand_proposals(&mut self, job: &JobId) -> Result<&[Proposal], WorkflowError> {
        self.proposals.list(job).await
    }

    /// First expansion fetches and fires the viewed signal.
    pub async fn expand_polls(&mut self, job: &JobId) -> Result<&[Poll], WorkflowError> {
        self.polls.list(job).await
    }

    /// Accepts a proposal, then refreshes the job list because the job's
    /// own status and badges depend on it. A failed list refresh is logged
    /// and tolerated; badges stay eventually consistent.
    pub async fn accept_proposal(
        &mut self,
        job: &JobId,
        proposal: &ProposalId,
    ) -> Result<(), WorkflowError> {
        let job = self.require_job(job)?.clone();
        self.proposals.accept(&job, proposal).await?;

        match self.api.list_jobs().await {
            Ok(jobs) => self.jobs = jobs,
            Err(err) => warn!(error = %err, "job list refresh after accept failed"),
        }
        Ok(())
    }

    pub async fn reveal_contact(
        &mut self,
        job: &JobId,
        proposal: &ProposalId,
    ) -> Result<(), WorkflowError> {
        let job = self.require_job(job)?.clone();
        self.proposals.reveal_contact(&job, proposal).await
    }

    pub async fn create_poll(
        &mut self,
        job: &JobId,
        draft: &CreatePoll,
    ) -> Result<(), WorkflowError> {
        self.polls.create(job, draft).await
    }

    pub async fn vote(
        &mut self,
        job: &JobId,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<(), WorkflowError> {
        let job = self.require_job(job)?.clone();
        self.polls.vote(&job, poll, option).await
    }

    pub async fn approve(
        &mut self,
        job: &JobId,
        poll: &PollId,
        option: &OptionId,
    ) -> Result<(), WorkflowError> {
        let job = self.require_job(job)?.clone();
        self.polls.approve(&job, poll, option).await
    }

    pub async fn close_poll(&mut self, job: &JobId, poll: &PollId) -> Result<(), WorkflowError> {
        self.polls.close(job, poll).await
    }

    pub async fn delete_poll(&mut self, job: &JobId, poll: &PollId) -> Result<(), WorkflowError> {
        self.polls.delete(job, poll).await
    }

    /// Drops a job's cached panels so the next expansion re-fetches. Used
    /// to reconcile after a stale-state failure rather than guessing.
    pub fn invalidate(&mut self, job: &JobId) {
        self.proposals.invalidate(job);
        self.polls.invalidate(job);
    }

    fn require_job(&self, job: &JobId) -> Result<&Job, WorkflowError> {
        self.jobs
            .iter()
            .find(|j| &j.id == job)
            .ok_or_else(|| error::unknown_entity("job", job.as_str()).into())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::fake::FakeApi;
    use super::*;
    use crate::negotiation::{JobStatus, ProfileId, ProposalStatus};

    fn job(id: &str, title: &str, status: JobStatus, count: f64) -> Job {
        Job {
            id: JobId::from(id),
            client_id: ProfileId::from("c1"),
            title: String::from(title),
            category: None,
            location: Some(String::from("Utrecht")),
            status,
            proposal_count: Some(count),
            view_count: None,
            created_at: Utc::now(),
        }
    }

    fn proposal(id: &str, job: &str) -> Proposal {
        Proposal {
            id: ProposalId::from(id),
            job_id: JobId::from(job),
            pro_profile_id: ProfileId::from("pro1"),
            cover_letter: String::from("letter"),
            proposed_price: None,
            estimated_duration: None,
            estimated_duration_unit: None,
            status: ProposalStatus::Pending,
            contact_revealed: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn panels_fetch_lazily_and_independently() {
        let api = Arc::new(FakeApi::new());
        api.seed_jobs(vec![
            job("j1", "Bathroom remodel", JobStatus::Open, 1.0),
            job("j2", "Garden fence", JobStatus::Open, 0.0),
        ]);
        api.seed_proposals("j1", vec![proposal("p1", "j1")]);
        let mut view = JobsView::new(api.clone(), Actor::client("c1"));

        view.refresh().await.unwrap();
        assert_eq!(api.calls("list_proposals"), 0);
        assert_eq!(api.calls("list_polls"), 0);

        view.expand_proposals(&JobId::from("j1")).await.unwrap();
        assert_eq!(api.calls("list_proposals"), 1);
        // only the expanded job's panel was fetched, and polls not at all
        assert_eq!(api.calls("list_polls"), 0);

        // collapsing and re-expanding serves the cache
        view.expand_proposals(&JobId::from("j1")).await.unwrap();
        assert_eq!(api.calls("list_proposals"), 1);
    }

    #[tokio::test]
    async fn job_list_refresh_leaves_panel_caches_alone() {
        let api = Arc::new(FakeApi::new());
        api.seed_jobs(vec![job("j1", "Bathroom remodel", JobStatus::Open, 1.0)]);
        api.seed_proposals("j1", vec![proposal("p1", "j1")]);
        let mut view = JobsView::new(api.clone(), Actor::client("c1"));

        view.refresh().await.unwrap();
        view.expand_proposals(&JobId::from("j1")).await.unwrap();
        view.refresh().await.unwrap();
        view.expand_proposals(&JobId::from("j1")).await.unwrap();
        assert_eq!(api.calls("list_proposals"), 1);
    }

    #[tokio::test]
    async fn accept_updates_job_badges_from_server() {
        let api = Arc::new(FakeApi::new());
        api.seed_jobs(vec![job("j1", "Bathroom remodel", JobStatus::Open, 1.0)]);
        api.seed_proposals("j1", vec![proposal("p1", "j1")]);
        let mut view = JobsView::new(api.clone(), Actor::client("c1"));

        view.refresh().await.unwrap();
        view.expand_proposals(&JobId::from("j1")).await.unwrap();
        view.accept_proposal(&JobId::from("j1"), &ProposalId::from("p1"))
            .await
            .unwrap();

        // the job record came back from the server already moved along
        let j = view.job(&JobId::from("j1")).unwrap();
        assert_eq!(j.status, JobStatus::InProgress);
    }

    #[tokio::test]
    async fn filtering_is_pure_and_network_free() {
        let api = Arc::new(FakeApi::new());
        api.seed_jobs(vec![
            job("j1", "Bathroom remodel", JobStatus::Open, 0.0),
            job("j2", "Garden fence", JobStatus::Completed, 0.0),
        ]);
        let mut view = JobsView::new(api.clone(), Actor::client("c1"));
        view.refresh().await.unwrap();
        let calls_before = api.calls("list_jobs");

        let open_only = view.filtered(&JobFilter {
            status: Some(JobStatus::Open),
            query: String::new(),
        });
        assert_eq!(open_only.len(), 1);

        let by_location = view.filtered(&JobFilter {
            status: None,
            query: String::from("utrecht"),
        });
        assert_eq!(by_location.len(), 2);

        assert_eq!(api.calls("list_jobs"), calls_before);
    }

    #[tokio::test]
    async fn mutations_on_unlisted_jobs_are_rejected_locally() {
        let api = Arc::new(FakeApi::new());
        let mut view = JobsView::new(api.clone(), Actor::client("c1"));

        let err = view
            .accept_proposal(&JobId::from("ghost"), &ProposalId::from("p1"))
            .await;
        assert!(matches!(err, Err(WorkflowError::Transition(_))));
        assert_eq!(api.calls("accept_proposal"), 0);
    }
}
