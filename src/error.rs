use thiserror::Error;

/// Every rejection a session can produce. Operations either succeed with
/// their full effect or return one of these with no mutation at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("Vote session already exists")]
    AlreadyCreated,
    #[error("Vote session has not been created")]
    NotCreated,
    #[error("Voting window is closed")]
    VotingClosed,
    #[error("Not a candidate: {0}")]
    NotACandidate(String),
    #[error("{0} has already voted")]
    AlreadyVoted(String),
    #[error("{0} has no vote to update")]
    NoExistingVote(String),
    #[error("{0} already voted for {1}")]
    UnchangedPlace(String, String),
    #[error("Results are not visible at this time")]
    ResultsNotVisible,
}

pub type Result<T> = std::result::Result<T, VoteError>;
