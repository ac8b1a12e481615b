mod id;
mod job;
mod poll;
mod profile;
mod proposal;
mod role;

pub use id::{JobId, OptionId, PollId, ProfileId, ProposalId};
pub use job::{Job, JobFilter, JobStatus};
pub use poll::{
    CreateOption, CreatePoll, OptionContent, Poll, PollOption, PollStatus, OPTION_LIMITS,
};
pub use profile::{ContactAction, ContactGate, ProProfile};
pub use proposal::{CreateProposal, DurationUnit, Proposal, ProposalStatus};
pub use role::{Actor, Role};
