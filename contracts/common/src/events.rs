//! Protocol Events for Agora Governance
//!
//! Events are emitted during operation execution and can be indexed
//! off-ledger for building UIs, vote trackers, and notifications. Each
//! ledger owns an [`EventLog`] that accumulates events in execution
//! order.

use crate::types::{Address, ProposalId, Timestamp};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Token Events (0x01 - 0x1F)
    TokenTransfer = 0x01,
    TokenApproval = 0x02,
    TokenMint = 0x03,
    Delegated = 0x04,
    Undelegated = 0x05,

    // Lock Events (0x20 - 0x3F)
    TokensLocked = 0x20,
    TokensUnlocked = 0x21,

    // Proposal Events (0x40 - 0x5F)
    ProposalCreated = 0x40,
    VoteCast = 0x41,

    // Execution Events (0x60 - 0x7F)
    ProposalExecuted = 0x60,
    QuorumUpdated = 0x61,
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum GovEvent {
    // ============ Token Events ============

    /// Emitted on token transfer
    TokenTransfer {
        from: Address,
        to: Address,
        amount: u64,
        timestamp: Timestamp,
    },

    /// Emitted when an allowance is set
    TokenApproval {
        owner: Address,
        spender: Address,
        amount: u64,
        timestamp: Timestamp,
    },

    /// Emitted when tokens are minted
    TokenMint {
        to: Address,
        amount: u64,
        new_total_supply: u64,
        timestamp: Timestamp,
    },

    /// Emitted when a holder delegates voting weight
    Delegated {
        delegator: Address,
        delegate: Address,
        timestamp: Timestamp,
    },

    /// Emitted when a holder removes a delegation
    Undelegated {
        delegator: Address,
        previous_delegate: Address,
        timestamp: Timestamp,
    },

    // ============ Lock Events ============

    /// Emitted when tokens are locked into the voting pool
    TokensLocked {
        owner: Address,
        amount: u64,
        total_locked: u64,
        timestamp: Timestamp,
    },

    /// Emitted when locked tokens are withdrawn
    TokensUnlocked {
        owner: Address,
        amount: u64,
        remaining_locked: u64,
        timestamp: Timestamp,
    },

    // ============ Proposal Events ============

    /// Emitted when a new proposal is created
    ProposalCreated {
        proposal_id: ProposalId,
        proposer: Address,
        description_hash: [u8; 32],
        timestamp: Timestamp,
    },

    /// Emitted when a vote is cast
    VoteCast {
        proposal_id: ProposalId,
        voter: Address,
        support: bool,
        weight: u64,
        timestamp: Timestamp,
    },

    // ============ Execution Events ============

    /// Emitted when a proposal's action is executed
    ProposalExecuted {
        proposal_id: ProposalId,
        timestamp: Timestamp,
    },

    /// Emitted when an executed proposal amended the vote quorum
    QuorumUpdated {
        proposal_id: ProposalId,
        old_quorum: u64,
        new_quorum: u64,
        timestamp: Timestamp,
    },
}

impl GovEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::TokenTransfer { .. } => EventType::TokenTransfer,
            Self::TokenApproval { .. } => EventType::TokenApproval,
            Self::TokenMint { .. } => EventType::TokenMint,
            Self::Delegated { .. } => EventType::Delegated,
            Self::Undelegated { .. } => EventType::Undelegated,
            Self::TokensLocked { .. } => EventType::TokensLocked,
            Self::TokensUnlocked { .. } => EventType::TokensUnlocked,
            Self::ProposalCreated { .. } => EventType::ProposalCreated,
            Self::VoteCast { .. } => EventType::VoteCast,
            Self::ProposalExecuted { .. } => EventType::ProposalExecuted,
            Self::QuorumUpdated { .. } => EventType::QuorumUpdated,
        }
    }

    /// Get the ledger timestamp the event was emitted at
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::TokenTransfer { timestamp, .. }
            | Self::TokenApproval { timestamp, .. }
            | Self::TokenMint { timestamp, .. }
            | Self::Delegated { timestamp, .. }
            | Self::Undelegated { timestamp, .. }
            | Self::TokensLocked { timestamp, .. }
            | Self::TokensUnlocked { timestamp, .. }
            | Self::ProposalCreated { timestamp, .. }
            | Self::VoteCast { timestamp, .. }
            | Self::ProposalExecuted { timestamp, .. }
            | Self::QuorumUpdated { timestamp, .. } => *timestamp,
        }
    }

    /// Serialize event to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GovEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: GovEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[GovEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<GovEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&GovEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
