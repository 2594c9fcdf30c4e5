//! Agora Governance Engine
//!
//! Token-weighted governance: delegated stakeholders propose, vote on,
//! and execute changes to protocol parameters. The engine is an explicit
//! ledger value: every operation takes `&mut Governance` (and the token
//! ledger where tokens move), so the single-writer discipline is the
//! borrow checker's problem, not a runtime lock's.
//!
//! ## Core Operations
//!
//! - **propose / propose_by_delegate**: admit a proposal when the
//!   proposer's locked weight clears the threshold
//! - **lock_with_approval / unlock**: move tokens into and out of the
//!   voting pool against a prior approval
//! - **cast_vote / cast_vote_by_delegate**: record one vote per address
//!   per proposal at the voter's current locked weight
//! - **execute**: run the proposal's action exactly once, after quorum,
//!   majority, and the execution delay are all satisfied
//!
//! ## Lifecycle
//!
//! A proposal's phase is derived from elapsed time, never stored:
//! Pending -> Active -> {Defeated | Succeeded -> Executable -> Executed}.
//! Every time-dependent operation takes the current timestamp as a
//! parameter; nothing here reads a wall clock.

use std::collections::BTreeMap;
use std::fmt;

use agora_common::{
    errors::{GovError, GovResult},
    events::{EventLog, GovEvent},
    phase::phase_of,
    types::{
        Address, GovernanceConfig, Proposal, ProposalId, ProposalPhase, Timestamp, VoteRecord,
    },
};
use agora_gov_token::GovToken;
use sha2::{Digest, Sha256};

#[cfg(test)]
mod integration_tests;

// ============ Proposal Action ============

/// Capability invoked when a proposal executes.
///
/// The target of a proposal is an opaque invocable handle, not data: the
/// registry stores it next to the proposal record and the execution
/// engine runs it against a staged copy of the governance config. An
/// action is allowed to rewrite any config parameter; amending
/// `quorum_votes` is how the protocol changes its own admission rules.
pub trait ProposalAction: fmt::Debug {
    /// Apply the action to the (staged) governance config.
    ///
    /// Returning an error aborts the execution with no state change; the
    /// proposal stays executable and the call may be retried.
    fn execute(&self, config: &mut GovernanceConfig) -> GovResult<()>;
}

/// The canonical governance action: amend the vote quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumChange {
    /// New value for `quorum_votes`
    pub new_quorum: u64,
}

impl ProposalAction for QuorumChange {
    fn execute(&self, config: &mut GovernanceConfig) -> GovResult<()> {
        if self.new_quorum == 0 {
            return Err(GovError::InvalidInput {
                param: "new_quorum",
                reason: "quorum cannot be zero",
            });
        }
        config.quorum_votes = self.new_quorum;
        Ok(())
    }
}

// ============ Governance Ledger ============

/// The governance ledger: proposals, vote receipts, the lock pool, and
/// the live configuration.
///
/// All of it is one transactional unit with a single logical owner.
/// Operations validate every precondition before the first mutation, so
/// a returned error always means "nothing happened".
#[derive(Debug)]
pub struct Governance {
    /// The module's own address: owner of the lock pool on the token
    /// ledger and the spender named in holder approvals
    address: Address,
    /// Live governance parameters (amendable by executed proposals)
    config: GovernanceConfig,
    /// All proposals ever created, in id order (id = index + 1)
    proposals: Vec<Proposal>,
    /// Target action per proposal
    actions: BTreeMap<ProposalId, Box<dyn ProposalAction>>,
    /// Vote receipts: proposal -> voter -> record
    receipts: BTreeMap<ProposalId, BTreeMap<Address, VoteRecord>>,
    /// Locked balance per holder (the voting-weight pool)
    locks: BTreeMap<Address, u64>,
    /// Earliest timestamp each holder may withdraw locked tokens
    withdraw_after: BTreeMap<Address, Timestamp>,
    /// Emitted events
    events: EventLog,
}

impl Governance {
    /// Create a governance ledger at `address` with the given config.
    pub fn new(address: Address, config: GovernanceConfig) -> GovResult<Self> {
        if address == [0u8; 32] {
            return Err(GovError::InvalidInput {
                param: "address",
                reason: "governance address cannot be zero",
            });
        }
        config.validate()?;

        Ok(Self {
            address,
            config,
            proposals: Vec::new(),
            actions: BTreeMap::new(),
            receipts: BTreeMap::new(),
            locks: BTreeMap::new(),
            withdraw_after: BTreeMap::new(),
            events: EventLog::new(),
        })
    }

    // ============ Proposal Registry ============

    /// Create a proposal backed by the caller's own locked weight.
    pub fn propose(
        &mut self,
        caller: Address,
        action: Box<dyn ProposalAction>,
        description: &str,
        now: Timestamp,
    ) -> GovResult<ProposalId> {
        self.create_proposal(caller, action, description, now)
    }

    /// Create a proposal backed by a delegator's locked weight.
    ///
    /// The delegator must have delegated to the caller on the token
    /// ledger; a missing delegation counts as zero delegated weight. The
    /// delegator is recorded as the proposer, since it is their weight being
    /// consumed; the caller is only the transaction origin.
    pub fn propose_by_delegate(
        &mut self,
        token: &GovToken,
        caller: Address,
        delegator: Address,
        action: Box<dyn ProposalAction>,
        description: &str,
        now: Timestamp,
    ) -> GovResult<ProposalId> {
        if token.delegation_of(&delegator) != Some(caller) {
            return Err(GovError::InsufficientWeight {
                available: 0,
                required: self.config.proposal_threshold,
            });
        }
        self.create_proposal(delegator, action, description, now)
    }

    fn create_proposal(
        &mut self,
        proposer: Address,
        action: Box<dyn ProposalAction>,
        description: &str,
        now: Timestamp,
    ) -> GovResult<ProposalId> {
        if description.is_empty() {
            return Err(GovError::InvalidInput {
                param: "description",
                reason: "description cannot be empty",
            });
        }

        let available = self.locked_balance(&proposer);
        if available < self.config.proposal_threshold {
            return Err(GovError::InsufficientWeight {
                available,
                required: self.config.proposal_threshold,
            });
        }

        // One live proposal per proposer: the latest must have left
        // Pending/Active before a new one is admitted.
        if let Some(latest) = self.proposals.iter().rev().find(|p| p.proposer == proposer) {
            let phase = phase_of(latest, &self.config, now);
            if matches!(phase, ProposalPhase::Pending | ProposalPhase::Active) {
                return Err(GovError::LiveProposalExists {
                    proposal_id: latest.id,
                });
            }
        }

        let id = self.proposals.len() as ProposalId + 1;
        let proposal = Proposal::new(id, proposer, description.into(), now);
        let description_hash = proposal.description_hash;
        let locked_until = proposal.executable_at(&self.config);

        self.proposals.push(proposal);
        self.actions.insert(id, action);
        self.extend_withdraw_lock(proposer, locked_until);

        self.events.emit(GovEvent::ProposalCreated {
            proposal_id: id,
            proposer,
            description_hash,
            timestamp: now,
        });

        Ok(id)
    }

    // ============ Lock / Vote-Weight Ledger ============

    /// Lock `amount` tokens into the voting pool.
    ///
    /// Requires a prior approval of at least `amount` from `owner` to
    /// this module's address; the tokens move into the module's balance
    /// and the owner's locked weight grows by the same amount.
    pub fn lock_with_approval(
        &mut self,
        token: &mut GovToken,
        owner: Address,
        amount: u64,
        now: Timestamp,
    ) -> GovResult<()> {
        let total_locked = self
            .locked_balance(&owner)
            .checked_add(amount)
            .ok_or(GovError::Overflow)?;

        // The transfer enforces allowance and balance; it runs before
        // any lock mutation so a failed transfer leaves nothing behind.
        token.transfer_from(self.address, owner, self.address, amount, now)?;

        self.locks.insert(owner, total_locked);

        self.events.emit(GovEvent::TokensLocked {
            owner,
            amount,
            total_locked,
            timestamp: now,
        });

        Ok(())
    }

    /// Withdraw `amount` locked tokens back to `owner`.
    ///
    /// Blocked while the owner's withdrawal lock is running: proposing
    /// and voting both extend it to the relevant proposal's
    /// execution-window start, so weight cannot exit mid-lifecycle.
    pub fn unlock(
        &mut self,
        token: &mut GovToken,
        owner: Address,
        amount: u64,
        now: Timestamp,
    ) -> GovResult<()> {
        if amount == 0 {
            return Err(GovError::ZeroAmount);
        }

        if let Some(&until) = self.withdraw_after.get(&owner) {
            if now < until {
                return Err(GovError::WithdrawalLocked { until, now });
            }
        }

        let available = self.locked_balance(&owner);
        if available < amount {
            return Err(GovError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        token.transfer(self.address, owner, amount, now)?;
        let remaining_locked = available - amount;
        self.locks.insert(owner, remaining_locked);

        self.events.emit(GovEvent::TokensUnlocked {
            owner,
            amount,
            remaining_locked,
            timestamp: now,
        });

        Ok(())
    }

    // ============ Voting Engine ============

    /// Cast a vote with the caller's own locked weight.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        proposal_id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> GovResult<()> {
        self.record_vote(voter, proposal_id, support, now)
    }

    /// Cast a vote on behalf of a delegator, with the delegator's locked
    /// weight.
    ///
    /// The vote is recorded for the delegator, so the one-vote-per-
    /// address rule covers direct and delegated casts uniformly.
    pub fn cast_vote_by_delegate(
        &mut self,
        token: &GovToken,
        caller: Address,
        delegator: Address,
        proposal_id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> GovResult<()> {
        if token.delegation_of(&delegator) != Some(caller) {
            return Err(GovError::NotDelegated { delegator, caller });
        }
        self.record_vote(delegator, proposal_id, support, now)
    }

    fn record_vote(
        &mut self,
        voter: Address,
        proposal_id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> GovResult<()> {
        let idx = self.index_of(proposal_id)?;

        let phase = phase_of(&self.proposals[idx], &self.config, now);
        if !phase.accepts_votes() {
            return Err(GovError::ProposalNotActive { proposal_id, phase });
        }

        if self
            .receipts
            .get(&proposal_id)
            .is_some_and(|r| r.contains_key(&voter))
        {
            return Err(GovError::AlreadyVoted { proposal_id, voter });
        }

        // Weight is the voter's locked balance right now, fixed into the
        // receipt; later lock changes never touch this tally again.
        let weight = self.locked_balance(&voter);
        if weight == 0 {
            return Err(GovError::NoVotingWeight { voter });
        }

        let locked_until = self.proposals[idx].executable_at(&self.config);

        {
            let proposal = &mut self.proposals[idx];
            if support {
                proposal.for_votes = proposal
                    .for_votes
                    .checked_add(weight)
                    .ok_or(GovError::Overflow)?;
            } else {
                proposal.against_votes = proposal
                    .against_votes
                    .checked_add(weight)
                    .ok_or(GovError::Overflow)?;
            }
        }

        let receipt_id = vote_receipt_id(proposal_id, &voter, support, weight, now);
        self.receipts.entry(proposal_id).or_default().insert(
            voter,
            VoteRecord {
                proposal_id,
                voter,
                support,
                weight,
                cast_at: now,
                receipt_id,
            },
        );
        self.extend_withdraw_lock(voter, locked_until);

        self.events.emit(GovEvent::VoteCast {
            proposal_id,
            voter,
            support,
            weight,
            timestamp: now,
        });

        Ok(())
    }

    // ============ Execution Engine ============

    /// Execute a proposal's action, exactly once.
    ///
    /// The action runs against a staged copy of the config; only a clean
    /// run commits the amendment and flips `executed`. A failing action
    /// surfaces as `ActionExecutionFailed` with no state change; the
    /// proposal stays executable, and the window never expires.
    pub fn execute(&mut self, proposal_id: ProposalId, now: Timestamp) -> GovResult<()> {
        let idx = self.index_of(proposal_id)?;

        if self.proposals[idx].executed {
            return Err(GovError::AlreadyExecuted { proposal_id });
        }

        let phase = phase_of(&self.proposals[idx], &self.config, now);
        if phase != ProposalPhase::Executable {
            return Err(GovError::NotExecutable { proposal_id, phase });
        }

        // The registry stores the action with the proposal; a missing
        // entry means the ledger was built outside the registry.
        let action = self
            .actions
            .get(&proposal_id)
            .ok_or(GovError::ActionExecutionFailed { proposal_id })?;

        let mut staged = self.config.clone();
        action
            .execute(&mut staged)
            .map_err(|_| GovError::ActionExecutionFailed { proposal_id })?;
        // An action may rewrite any parameter, but never into a config
        // that would wedge the protocol.
        staged
            .validate()
            .map_err(|_| GovError::ActionExecutionFailed { proposal_id })?;

        let old_quorum = self.config.quorum_votes;
        self.config = staged;
        self.proposals[idx].executed = true;

        self.events.emit(GovEvent::ProposalExecuted {
            proposal_id,
            timestamp: now,
        });
        if self.config.quorum_votes != old_quorum {
            self.events.emit(GovEvent::QuorumUpdated {
                proposal_id,
                old_quorum,
                new_quorum: self.config.quorum_votes,
                timestamp: now,
            });
        }

        Ok(())
    }

    // ============ Read Accessors ============

    /// Number of proposals ever created
    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Look up a proposal by id
    pub fn proposal(&self, proposal_id: ProposalId) -> GovResult<&Proposal> {
        let idx = self.index_of(proposal_id)?;
        Ok(&self.proposals[idx])
    }

    /// Derived phase of a proposal at `now`
    pub fn phase(&self, proposal_id: ProposalId, now: Timestamp) -> GovResult<ProposalPhase> {
        let idx = self.index_of(proposal_id)?;
        Ok(phase_of(&self.proposals[idx], &self.config, now))
    }

    /// The recorded vote of `voter` on a proposal, if any
    pub fn receipt(&self, proposal_id: ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.receipts.get(&proposal_id)?.get(voter)
    }

    /// Locked balance (= current voting weight) of a holder
    pub fn locked_balance(&self, owner: &Address) -> u64 {
        self.locks.get(owner).copied().unwrap_or(0)
    }

    /// Total tokens held in the voting pool
    pub fn total_locked(&self) -> u64 {
        self.locks.values().sum()
    }

    /// Earliest timestamp `owner` may withdraw locked tokens, if a
    /// withdrawal lock is set
    pub fn withdraw_unlocks_at(&self, owner: &Address) -> Option<Timestamp> {
        self.withdraw_after.get(owner).copied()
    }

    /// Minimum aggregate "for" weight for a proposal to succeed
    pub fn quorum_votes(&self) -> u64 {
        self.config.quorum_votes
    }

    /// Delay between proposal creation and the start of voting
    pub fn voting_delay(&self) -> u64 {
        self.config.voting_delay
    }

    /// Length of the voting window
    pub fn voting_period(&self) -> u64 {
        self.config.voting_period
    }

    /// Review period between voting close and permitted execution
    pub fn execution_delay(&self) -> u64 {
        self.config.execution_delay
    }

    /// Minimum locked weight required to create a proposal
    pub fn proposal_threshold(&self) -> u64 {
        self.config.proposal_threshold
    }

    /// The live governance configuration
    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// The module's own address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Events emitted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ============ Internal ============

    fn index_of(&self, proposal_id: ProposalId) -> GovResult<usize> {
        if proposal_id == 0 || proposal_id > self.proposals.len() as u64 {
            return Err(GovError::ProposalNotFound { proposal_id });
        }
        Ok((proposal_id - 1) as usize)
    }

    fn extend_withdraw_lock(&mut self, owner: Address, until: Timestamp) {
        let entry = self.withdraw_after.entry(owner).or_insert(0);
        if until > *entry {
            *entry = until;
        }
    }
}

/// SHA-256 receipt over the immutable fields of a vote
fn vote_receipt_id(
    proposal_id: ProposalId,
    voter: &Address,
    support: bool,
    weight: u64,
    cast_at: Timestamp,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(proposal_id.to_le_bytes());
    hasher.update(voter);
    hasher.update([support as u8]);
    hasher.update(weight.to_le_bytes());
    hasher.update(cast_at.to_le_bytes());
    hasher.finalize().into()
}

// ============ Tests ============
