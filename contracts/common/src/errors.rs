//! Error Types for the Agora Governance Protocol
//!
//! Typed errors with enough context to diagnose a rejected operation
//! without replaying it. Every mutating operation validates all of its
//! preconditions before touching ledger state, so any of these errors
//! implies the ledger is exactly as it was before the call.

use crate::types::{Address, ProposalId, ProposalPhase, Timestamp};

/// Result type alias for governance operations
pub type GovResult<T> = Result<T, GovError>;

/// Main error enum for all governance protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GovError {
    // ============ Proposal Errors ============
    /// No proposal exists with the given id
    ProposalNotFound { proposal_id: ProposalId },

    /// Caller lacks the delegated/locked weight the operation requires
    InsufficientWeight { available: u64, required: u64 },

    /// The proposer already has a proposal that is Pending or Active
    LiveProposalExists { proposal_id: ProposalId },

    // ============ Voting Errors ============
    /// Votes are only accepted while the proposal is Active
    ProposalNotActive {
        proposal_id: ProposalId,
        phase: ProposalPhase,
    },

    /// The voter already has a recorded vote on this proposal
    AlreadyVoted {
        proposal_id: ProposalId,
        voter: Address,
    },

    /// The voter has no locked balance to vote with
    NoVotingWeight { voter: Address },

    /// The delegator has not delegated to the caller
    NotDelegated { delegator: Address, caller: Address },

    // ============ Execution Errors ============
    /// The proposal is not in the Executable phase
    NotExecutable {
        proposal_id: ProposalId,
        phase: ProposalPhase,
    },

    /// The proposal has already been executed
    AlreadyExecuted { proposal_id: ProposalId },

    /// The proposal's target action itself raised an error.
    /// The proposal stays executable and may be retried.
    ActionExecutionFailed { proposal_id: ProposalId },

    // ============ Token / Lock Errors ============
    /// Balance too small for the requested amount
    InsufficientBalance { available: u64, requested: u64 },

    /// Approved allowance too small for the requested amount
    InsufficientAllowance { allowance: u64, requested: u64 },

    /// Locked tokens cannot be withdrawn until the owner's last voted
    /// proposal has cleared its execution window
    WithdrawalLocked { until: Timestamp, now: Timestamp },

    /// Zero amount not allowed
    ZeroAmount,

    /// A holder cannot delegate voting weight to itself
    SelfDelegation { holder: Address },

    // ============ Math / Input Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Invalid input parameter
    InvalidInput {
        param: &'static str,
        reason: &'static str,
    },
}

impl GovError {
    /// Returns a stable error code for logging/indexing
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProposalNotFound { .. } => "E001_PROPOSAL_NOT_FOUND",
            Self::InsufficientWeight { .. } => "E002_INSUFFICIENT_WEIGHT",
            Self::LiveProposalExists { .. } => "E003_LIVE_PROPOSAL",
            Self::ProposalNotActive { .. } => "E010_PROPOSAL_NOT_ACTIVE",
            Self::AlreadyVoted { .. } => "E011_ALREADY_VOTED",
            Self::NoVotingWeight { .. } => "E012_NO_VOTING_WEIGHT",
            Self::NotDelegated { .. } => "E013_NOT_DELEGATED",
            Self::NotExecutable { .. } => "E020_NOT_EXECUTABLE",
            Self::AlreadyExecuted { .. } => "E021_ALREADY_EXECUTED",
            Self::ActionExecutionFailed { .. } => "E022_ACTION_FAILED",
            Self::InsufficientBalance { .. } => "E030_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E031_INSUFFICIENT_ALLOWANCE",
            Self::WithdrawalLocked { .. } => "E032_WITHDRAWAL_LOCKED",
            Self::ZeroAmount => "E033_ZERO_AMOUNT",
            Self::SelfDelegation { .. } => "E034_SELF_DELEGATION",
            Self::Overflow => "E040_OVERFLOW",
            Self::InvalidInput { .. } => "E041_INVALID_INPUT",
        }
    }

    /// Returns true if retrying the same call can succeed.
    ///
    /// Only a failed target action is retryable: the proposal stays
    /// executable until the action runs cleanly. Every other error needs
    /// a different caller action first (more weight, a later timestamp,
    /// a different proposal).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ActionExecutionFailed { .. })
    }
}
