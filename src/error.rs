use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;
use std::convert::From;

use reqwest::StatusCode;

use crate::negotiation::{PollId, PollStatus, ProposalId, ProposalStatus};

/// A request that is malformed on its face, caught before any network call.
#[derive(Debug)]
pub struct ValidationError {
    message: String,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: {}", self.message)
    }
}

impl Error for ValidationError {}

pub fn poll_title_empty() -> ValidationError {
    ValidationError {
        message: String::from("poll title must not be empty"),
    }
}

pub fn poll_option_limit_exceeded(limits: RangeInclusive<usize>, count: usize) -> ValidationError {
    ValidationError {
        message: format!(
            "poll must have between {} and {} usable options, got {count}",
            limits.start(),
            limits.end()
        ),
    }
}

pub fn poll_option_content_missing(id: &str) -> ValidationError {
    ValidationError {
        message: format!("poll option {id} carries neither text nor an image"),
    }
}

pub fn poll_option_unusable(index: usize) -> ValidationError {
    ValidationError {
        message: format!("poll option {index} carries neither text nor an image"),
    }
}

pub fn proposal_cover_letter_empty() -> ValidationError {
    ValidationError {
        message: String::from("proposal cover letter must not be empty"),
    }
}

pub fn proposal_price_not_positive(price: f64) -> ValidationError {
    ValidationError {
        message: format!("proposed price must be positive, got {price}"),
    }
}

/// The acting role is not allowed to perform the operation at all.
#[derive(Debug)]
pub struct PermissionError {
    message: String,
}

impl Display for PermissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Permission error: {}", self.message)
    }
}

impl Error for PermissionError {}

pub fn not_job_owner(operation: &str) -> PermissionError {
    PermissionError {
        message: format!("only the job's owning client may {operation}"),
    }
}

pub fn not_poll_creator(operation: &str) -> PermissionError {
    PermissionError {
        message: format!("only the poll's creator may {operation}"),
    }
}

pub fn not_professional(operation: &str) -> PermissionError {
    PermissionError {
        message: format!("only a professional may {operation}"),
    }
}

/// The entity is not in a state from which the requested transition exists.
#[derive(Debug)]
pub struct TransitionError {
    message: String,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "State error: {}", self.message)
    }
}

impl Error for TransitionError {}

pub fn proposal_not_pending(id: &ProposalId, status: ProposalStatus) -> TransitionError {
    TransitionError {
        message: format!("proposal {id} is {status}, expected pending"),
    }
}

pub fn proposal_not_revealable(id: &ProposalId, status: ProposalStatus) -> TransitionError {
    TransitionError {
        message: format!(
            "proposal {id} is {status}, contact can only be revealed while pending or accepted"
        ),
    }
}

pub fn poll_not_active(id: &PollId, status: PollStatus) -> TransitionError {
    TransitionError {
        message: format!("poll {id} is {status}, expected active"),
    }
}

pub fn approve_requires_vote(id: &PollId) -> TransitionError {
    TransitionError {
        message: format!("poll {id} cannot be approved before a vote is selected"),
    }
}

pub fn unknown_entity(kind: &str, id: &str) -> TransitionError {
    TransitionError {
        message: format!("{kind} {id} is not in the local cache"),
    }
}

/// A mutation against an entity that already has a request in flight.
#[derive(Debug)]
pub struct BusyError {
    entity: String,
}

impl Display for BusyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Another request is still in flight for {}", self.entity)
    }
}

impl Error for BusyError {}

pub fn entity_busy(entity: &str) -> BusyError {
    BusyError {
        entity: String::from(entity),
    }
}

/// Failure of a network round trip: transport breakage, a non-success
/// status from the server, or an undecodable payload.
#[derive(Debug)]
pub struct ApiError {
    pub code: Option<StatusCode>,
    message: String,
    source: Option<reqwest::Error>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError {
            code: value.status(),
            message: format!("request failed: {value}"),
            source: Some(value),
        }
    }
}

pub fn api_rejection(code: StatusCode, subject: &str) -> ApiError {
    ApiError {
        code: Some(code),
        message: format!("server rejected {subject}"),
        source: None,
    }
}

pub fn api_failure(subject: &str) -> ApiError {
    ApiError {
        code: Some(StatusCode::INTERNAL_SERVER_ERROR),
        message: format!("request failed for {subject}"),
        source: None,
    }
}

/// Everything a workflow controller can report to its caller.
#[derive(Debug)]
pub enum WorkflowError {
    Validation(ValidationError),
    Permission(PermissionError),
    Transition(TransitionError),
    Busy(BusyError),
    Api(ApiError),
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Validation(e) => e.fmt(f),
            WorkflowError::Permission(e) => e.fmt(f),
            WorkflowError::Transition(e) => e.fmt(f),
            WorkflowError::Busy(e) => e.fmt(f),
            WorkflowError::Api(e) => e.fmt(f),
        }
    }
}

impl Error for WorkflowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkflowError::Validation(e) => Some(e),
            WorkflowError::Permission(e) => Some(e),
            WorkflowError::Transition(e) => Some(e),
            WorkflowError::Busy(e) => Some(e),
            WorkflowError::Api(e) => Some(e),
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(value: ValidationError) -> Self {
        WorkflowError::Validation(value)
    }
}

impl From<PermissionError> for WorkflowError {
    fn from(value: PermissionError) -> Self {
        WorkflowError::Permission(value)
    }
}

impl From<TransitionError> for WorkflowError {
    fn from(value: TransitionError) -> Self {
        WorkflowError::Transition(value)
    }
}

impl From<BusyError> for WorkflowError {
    fn from(value: BusyError) -> Self {
        WorkflowError::Busy(value)
    }
}

impl From<ApiError> for WorkflowError {
    fn from(value: ApiError) -> Self {
        WorkflowError::Api(value)
    }
}

impl WorkflowError {
    /// True when the failure never left the client (no network call issued).
    pub fn is_local(&self) -> bool {
        !matches!(self, WorkflowError::Api(_))
    }
}
