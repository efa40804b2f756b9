use thiserror::Error;

use crate::model::{ElectionId, Identity};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when operating on the registry.
///
/// Every variant is a caller-side misuse or a timing violation; none are
/// transient, and a failed call leaves all registry state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A registration or voting period at or below the minimum length.
    #[error("registration and voting periods have to be greater than {minimum} seconds")]
    InvalidPeriod { minimum: i64 },
    /// The hard end does not leave room for both windows.
    #[error("(registration period + voting period) must be less than the end offset")]
    InvalidScheduling,
    #[error("no election with id {0}")]
    ElectionNotFound(ElectionId),
    /// Candidate registration attempted outside the registration window.
    #[error("no registration period open for election {0}")]
    RegistrationClosed(ElectionId),
    #[error("'{candidate}' is already registered in election {election}")]
    AlreadyRegistered {
        election: ElectionId,
        candidate: Identity,
    },
    /// Vote attempted before the voting window opened or after it closed.
    #[error("voting period is not open for election {0}")]
    VotingNotOpen(ElectionId),
    #[error("candidate '{candidate}' is not registered in election {election}")]
    CandidateNotRegistered {
        election: ElectionId,
        candidate: Identity,
    },
    #[error("'{voter}' has already voted in election {election}")]
    AlreadyVoted {
        election: ElectionId,
        voter: Identity,
    },
}
