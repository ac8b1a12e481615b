use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use crate::config::Config;
use crate::error::{self, ApiError};
use crate::negotiation::{
    CreatePoll, CreateProposal, Job, JobId, OptionId, Poll, PollId, Proposal, ProposalId,
};

/// The marketplace's remote contract, one method per logical operation.
/// Transport framing beyond the bearer credential is the server's concern.
#[allow(async_fn_in_trait)]
pub trait MarketplaceApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;

    async fn list_proposals(&self, job: &JobId) -> Result<Vec<Proposal>, ApiError>;
    async fn submit_proposal(
        &self,
        job: &JobId,
        draft: &CreateProposal,
    ) -> Result<Proposal, ApiError>;
    async fn accept_proposal(&self, proposal: &ProposalId) -> Result<(), ApiError>;
    async fn reveal_contact(&self, proposal: &ProposalId) -> Result<(), ApiError>;

    async fn list_polls(&self, job: &JobId) -> Result<Vec<Poll>, ApiError>;
    async fn create_poll(&self, job: &JobId, draft: &CreatePoll) -> Result<Poll, ApiError>;
    async fn vote(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError>;
    async fn approve(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError>;
    async fn close_poll(&self, poll: &PollId) -> Result<(), ApiError>;
    async fn delete_poll(&self, poll: &PollId) -> Result<(), ApiError>;
    async fn mark_polls_viewed(&self, job: &JobId) -> Result<(), ApiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionBody<'a> {
    option_id: &'a OptionId,
}

/// HTTP implementation of the contract. Credentials come in through
/// [`Config`] at construction time.
pub struct HttpApi {
    http: Client,
    base_url: String,
    bearer_token: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> HttpApi {
        HttpApi {
            http: Client::new(),
            base_url: String::from(config.base_url.trim_end_matches('/')),
            bearer_token: config.bearer_token.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.bearer_token)
    }

    async fn send(&self, builder: RequestBuilder, subject: &str) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error::api_rejection(status, subject));
        }
        Ok(response)
    }
}

impl MarketplaceApi for HttpApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response = self
            .send(self.request(Method::GET, "/jobs/my-jobs"), "job list")
            .await?;
        Ok(response.json().await?)
    }

    async fn list_proposals(&self, job: &JobId) -> Result<Vec<Proposal>, ApiError> {
        let path = format!("/jobs/{job}/proposals");
        let response = self
            .send(self.request(Method::GET, &path), "proposal list")
            .await?;
        Ok(response.json().await?)
    }

    async fn submit_proposal(
        &self,
        job: &JobId,
        draft: &CreateProposal,
    ) -> Result<Proposal, ApiError> {
        let path = format!("/jobs/{job}/proposals");
        let builder = self.request(Method::POST, &path).json(draft);
        let response = self.send(builder, "proposal submission").await?;
        Ok(response.json().await?)
    }

    async fn accept_proposal(&self, proposal: &ProposalId) -> Result<(), ApiError> {
        let path = format!("/jobs/proposals/{proposal}/accept");
        self.send(self.request(Method::POST, &path), "proposal accept")
            .await?;
        Ok(())
    }

    async fn reveal_contact(&self, proposal: &ProposalId) -> Result<(), ApiError> {
        let path = format!("/jobs/proposals/{proposal}/reveal-contact");
        self.send(self.request(Method::POST, &path), "contact reveal")
            .await?;
        Ok(())
    }

    async fn list_polls(&self, job: &JobId) -> Result<Vec<Poll>, ApiError> {
        let path = format!("/jobs/{job}/polls");
        let response = self
            .send(self.request(Method::GET, &path), "poll list")
            .await?;
        Ok(response.json().await?)
    }

    async fn create_poll(&self, job: &JobId, draft: &CreatePoll) -> Result<Poll, ApiError> {
        let path = format!("/jobs/{job}/polls");
        let builder = self.request(Method::POST, &path).json(draft);
        let response = self.send(builder, "poll creation").await?;
        Ok(response.json().await?)
    }

    async fn vote(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError> {
        let path = format!("/jobs/polls/{poll}/vote");
        let builder = self
            .request(Method::POST, &path)
            .json(&OptionBody { option_id: option });
        self.send(builder, "vote").await?;
        Ok(())
    }

    async fn approve(&self, poll: &PollId, option: &OptionId) -> Result<(), ApiError> {
        let path = format!("/jobs/polls/{poll}/approve");
        let builder = self
            .request(Method::POST, &path)
            .json(&OptionBody { option_id: option });
        self.send(builder, "poll approval").await?;
        Ok(())
    }

    async fn close_poll(&self, poll: &PollId) -> Result<(), ApiError> {
        let path = format!("/jobs/polls/{poll}/close");
        self.send(self.request(Method::POST, &path), "poll close")
            .await?;
        Ok(())
    }

    async fn delete_poll(&self, poll: &PollId) -> Result<(), ApiError> {
        let path = format!("/jobs/polls/{poll}");
        self.send(self.request(Method::DELETE, &path), "poll deletion")
            .await?;
        Ok(())
    }

    async fn mark_polls_viewed(&self, job: &JobId) -> Result<(), ApiError> {
        let path = format!("/jobs/projects/{job}/polls/viewed");
        self.send(self.request(Method::POST, &path), "polls viewed")
            .await?;
        Ok(())
    }
}
