//! Phase Clock
//!
//! Derives a proposal's lifecycle phase from elapsed time and the live
//! governance configuration. The phase is never stored: recomputing it
//! on every query means the reported phase cannot drift from the clock,
//! and callers evaluate state at any point without coordination.
//!
//! Phases form a strict forward progression:
//!
//! ```text
//! Pending -> Active -> Defeated                        (terminal)
//!                   \-> Succeeded -> Executable -> Executed (terminal)
//! ```

use crate::types::{GovernanceConfig, Proposal, ProposalPhase, Timestamp};

/// Derive the current phase of a proposal.
///
/// Pure function of `(proposal, config, now)`. Quorum and timing are
/// read from the config at evaluation time, so an amended quorum applies
/// to proposals still in flight.
pub fn phase_of(proposal: &Proposal, config: &GovernanceConfig, now: Timestamp) -> ProposalPhase {
    if proposal.executed {
        return ProposalPhase::Executed;
    }

    if now < proposal.voting_starts_at(config) {
        return ProposalPhase::Pending;
    }

    if now < proposal.voting_ends_at(config) {
        return ProposalPhase::Active;
    }

    // Voting has closed: the tallies are final.
    if !proposal.passed(config) {
        return ProposalPhase::Defeated;
    }

    if now < proposal.executable_at(config) {
        ProposalPhase::Succeeded
    } else {
        // The execution window never expires: a succeeded proposal stays
        // executable until it is actually executed.
        ProposalPhase::Executable
    }
}
