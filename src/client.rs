mod api;
#[cfg(test)]
mod fake;
mod jobs;
mod polls;
mod proposals;

pub use api::{HttpApi, MarketplaceApi};
pub use jobs::JobsView;
pub use polls::PollWorkflow;
pub use proposals::ProposalWorkflow;
