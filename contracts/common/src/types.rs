//! Core Types for the Agora Governance Protocol
//!
//! Fundamental data structures shared by the token ledger and the
//! governance engine: proposals, vote records, the runtime governance
//! configuration, and the derived proposal phase.

use crate::constants::governance as gov_config;
use crate::errors::{GovError, GovResult};
use crate::String;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for proposal identifiers (sequential, starting at 1)
pub type ProposalId = u64;

/// Type alias for ledger timestamps (seconds)
pub type Timestamp = u64;

// ============ Proposal Phase ============

/// Derived lifecycle stage of a proposal.
///
/// Never stored: always recomputed from `(now, created_at, tallies,
/// config)` by [`phase_of`](crate::phase::phase_of), so the reported
/// phase can never desynchronize from the clock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum ProposalPhase {
    /// Created, voting has not opened yet
    Pending,
    /// Voting window is open
    Active,
    /// Voting closed without quorum or majority (terminal)
    Defeated,
    /// Voting closed with quorum and majority; execution delay running
    Succeeded,
    /// Execution delay elapsed; the action may be executed
    Executable,
    /// The action has been executed (terminal)
    Executed,
}

impl ProposalPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Defeated | Self::Executed)
    }

    /// Returns true if votes are accepted in this phase
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active)
    }
}

// ============ Proposal ============

/// A governance proposal.
///
/// The callable target is held separately by the governance engine (it is
/// a capability, not data); this record is the serializable part that
/// persists for audit. Mutated only by vote casting (tallies) and
/// execution (`executed`); `created_at` is set once and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Proposal {
    /// Unique sequential id (first proposal has id 1)
    pub id: ProposalId,
    /// Proposer address (the weight owner, not necessarily the caller)
    pub proposer: Address,
    /// Human-readable description
    pub description: String,
    /// SHA-256 of the description, stable reference for off-ledger indexing
    pub description_hash: [u8; 32],
    /// Ledger timestamp at creation
    pub created_at: Timestamp,
    /// Aggregate "for" weight
    pub for_votes: u64,
    /// Aggregate "against" weight
    pub against_votes: u64,
    /// Whether the target action has been executed
    pub executed: bool,
}

impl Proposal {
    /// Create a new proposal with zeroed tallies
    pub fn new(id: ProposalId, proposer: Address, description: String, now: Timestamp) -> Self {
        let description_hash = hash_description(&description);
        Self {
            id,
            proposer,
            description,
            description_hash,
            created_at: now,
            for_votes: 0,
            against_votes: 0,
            executed: false,
        }
    }

    /// Timestamp at which voting opens
    pub fn voting_starts_at(&self, config: &GovernanceConfig) -> Timestamp {
        self.created_at.saturating_add(config.voting_delay)
    }

    /// Timestamp at which voting closes
    pub fn voting_ends_at(&self, config: &GovernanceConfig) -> Timestamp {
        self.voting_starts_at(config)
            .saturating_add(config.voting_period)
    }

    /// Timestamp at which a succeeded proposal becomes executable
    pub fn executable_at(&self, config: &GovernanceConfig) -> Timestamp {
        self.voting_ends_at(config)
            .saturating_add(config.execution_delay)
    }

    /// Whether the recorded tallies clear quorum and majority.
    ///
    /// Meaningful once voting has closed; quorum is read from the live
    /// config at evaluation time.
    pub fn passed(&self, config: &GovernanceConfig) -> bool {
        self.for_votes > self.against_votes && self.for_votes >= config.quorum_votes
    }
}

/// SHA-256 of a proposal description
pub fn hash_description(description: &str) -> [u8; 32] {
    let digest = Sha256::digest(description.as_bytes());
    digest.into()
}

// ============ Vote Record ============

/// A recorded vote on a proposal.
///
/// Append-only: at most one per (proposal, voter), never altered or
/// revoked. The weight is fixed at cast time; later lock changes do not
/// retroactively adjust the tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VoteRecord {
    /// Proposal voted on
    pub proposal_id: ProposalId,
    /// Voter address (the weight owner, for delegated casts too)
    pub voter: Address,
    /// True for, false against
    pub support: bool,
    /// Locked balance of the voter at cast time
    pub weight: u64,
    /// Ledger timestamp when the vote was cast
    pub cast_at: Timestamp,
    /// SHA-256 receipt over (proposal, voter, support, weight, cast_at)
    pub receipt_id: [u8; 32],
}

// ============ Governance Config ============

/// Runtime governance parameters.
///
/// Part of the same transactional ledger state as the proposals
/// themselves: a successfully executed proposal is allowed to amend these
/// values (canonically `quorum_votes`), which is how the protocol
/// self-amends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GovernanceConfig {
    /// Delay between proposal creation and the start of voting (seconds)
    pub voting_delay: u64,
    /// Length of the voting window (seconds)
    pub voting_period: u64,
    /// Review period between voting close and permitted execution (seconds)
    pub execution_delay: u64,
    /// Minimum aggregate "for" weight for a proposal to succeed
    pub quorum_votes: u64,
    /// Minimum locked weight required to create a proposal
    pub proposal_threshold: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            voting_delay: gov_config::VOTING_DELAY,
            voting_period: gov_config::VOTING_PERIOD,
            execution_delay: gov_config::EXECUTION_DELAY,
            quorum_votes: gov_config::QUORUM_VOTES,
            proposal_threshold: gov_config::PROPOSAL_THRESHOLD,
        }
    }
}

impl GovernanceConfig {
    /// Check the config for values that would wedge the protocol
    pub fn validate(&self) -> GovResult<()> {
        if self.voting_period == 0 {
            return Err(GovError::InvalidInput {
                param: "voting_period",
                reason: "voting period cannot be zero",
            });
        }
        if self.quorum_votes == 0 {
            return Err(GovError::InvalidInput {
                param: "quorum_votes",
                reason: "quorum cannot be zero",
            });
        }
        Ok(())
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::token::ONE;

    fn test_config() -> GovernanceConfig {
        GovernanceConfig {
            voting_delay: 75,
            voting_period: 259_200,
            execution_delay: 172_800,
            quorum_votes: 25_000 * ONE,
            proposal_threshold: 1_000 * ONE,
        }
    }

    #[test]
    fn test_proposal_schedule() {
        let config = test_config();
        let proposal = Proposal::new(1, [1u8; 32], "Lower the quorum".into(), 1_000_000);

        assert_eq!(proposal.voting_starts_at(&config), 1_000_075);
        assert_eq!(proposal.voting_ends_at(&config), 1_259_275);
        assert_eq!(proposal.executable_at(&config), 1_432_075);
    }

    #[test]
    fn test_passed_requires_quorum_and_majority() {
        let config = test_config();
        let mut proposal = Proposal::new(1, [1u8; 32], "test".into(), 0);

        // Quorum exactly met, no against votes
        proposal.for_votes = config.quorum_votes;
        assert!(proposal.passed(&config));

        // One base unit short of quorum
        proposal.for_votes = config.quorum_votes - 1;
        assert!(!proposal.passed(&config));

        // Quorum met but tied
        proposal.for_votes = config.quorum_votes;
        proposal.against_votes = config.quorum_votes;
        assert!(!proposal.passed(&config));
    }

    #[test]
    fn test_description_hash_is_stable() {
        let a = Proposal::new(1, [1u8; 32], "Lower the quorum".into(), 0);
        let b = Proposal::new(2, [2u8; 32], "Lower the quorum".into(), 50);
        let c = Proposal::new(3, [1u8; 32], "Raise the quorum".into(), 0);

        assert_eq!(a.description_hash, b.description_hash);
        assert_ne!(a.description_hash, c.description_hash);
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = GovernanceConfig::default();
        assert_eq!(config.voting_delay, 75);
        assert_eq!(config.quorum_votes, 25_000 * ONE);
        assert_eq!(config.proposal_threshold, 1_000 * ONE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        config.quorum_votes = 0;
        assert!(matches!(
            config.validate(),
            Err(GovError::InvalidInput { .. })
        ));

        let mut config = test_config();
        config.voting_period = 0;
        assert!(matches!(
            config.validate(),
            Err(GovError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_terminal_phases() {
        assert!(ProposalPhase::Defeated.is_terminal());
        assert!(ProposalPhase::Executed.is_terminal());
        assert!(!ProposalPhase::Succeeded.is_terminal());
        assert!(ProposalPhase::Active.accepts_votes());
        assert!(!ProposalPhase::Executable.accepts_votes());
    }
}
