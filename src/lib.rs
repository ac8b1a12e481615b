mod client;
mod config;
pub mod error;
mod negotiation;

pub use client::{HttpApi, JobsView, MarketplaceApi, PollWorkflow, ProposalWorkflow};
pub use config::Config;
pub use negotiation::{
    Actor, ContactAction, ContactGate, CreateOption, CreatePoll, CreateProposal, DurationUnit,
    Job, JobFilter, JobId, JobStatus, OptionContent, OptionId, Poll, PollId, PollOption,
    PollStatus, ProProfile, ProfileId, Proposal, ProposalId, ProposalStatus, Role, OPTION_LIMITS,
};
