//! Agora Governance Token
//!
//! The token ledger collaborator for the governance module: an
//! account-model balance ledger with allowances and vote-weight
//! delegation. The governance engine never touches balances directly;
//! it moves tokens through `transfer_from` against a prior approval,
//! exactly like any other spender.
//!
//! ## Core Operations
//!
//! - **mint**: create supply (genesis / test setup), capped
//! - **transfer / approve / transfer_from**: standard allowance ledger
//! - **delegate / undelegate**: assign voting weight to a representative
//!
//! All mutating operations validate every precondition before touching
//! state and emit an event on success.

use std::collections::BTreeMap;

use agora_common::{
    constants::supply,
    errors::{GovError, GovResult},
    events::{EventLog, GovEvent},
    types::{Address, Timestamp},
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Account-model token ledger with delegation.
///
/// A single logical owner (the enclosing ledger sequence) mutates this
/// value; operations take `&mut self` and are atomic: they either fully
/// apply or return an error leaving the ledger untouched. The event log
/// is transient and excluded from serialized snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GovToken {
    /// Current total supply
    total_supply: u64,
    /// Balance per holder
    balances: BTreeMap<Address, u64>,
    /// Allowances: owner -> spender -> remaining amount
    allowances: BTreeMap<Address, BTreeMap<Address, u64>>,
    /// Delegation: holder -> delegate
    delegations: BTreeMap<Address, Address>,
    /// Emitted events
    #[serde(skip)]
    #[borsh(skip)]
    events: EventLog,
}

impl GovToken {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Read Accessors ============

    /// Current total supply
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Balance of a holder (zero if unknown)
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Remaining allowance from `owner` to `spender`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// The delegate a holder has assigned, if any
    pub fn delegation_of(&self, holder: &Address) -> Option<Address> {
        self.delegations.get(holder).copied()
    }

    /// Events emitted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ============ Supply ============

    /// Mint new tokens to `to`.
    ///
    /// Used at genesis and in tests to distribute supply; the cap keeps
    /// aggregate vote tallies comfortably inside u64.
    pub fn mint(&mut self, to: Address, amount: u64, now: Timestamp) -> GovResult<()> {
        if amount == 0 {
            return Err(GovError::ZeroAmount);
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(GovError::Overflow)?;
        if new_supply > supply::MAX_SUPPLY {
            return Err(GovError::InvalidInput {
                param: "amount",
                reason: "mint would exceed max supply",
            });
        }

        self.credit(to, amount)?;
        self.total_supply = new_supply;

        self.events.emit(GovEvent::TokenMint {
            to,
            amount,
            new_total_supply: new_supply,
            timestamp: now,
        });

        Ok(())
    }

    // ============ Transfers ============

    /// Transfer `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
        now: Timestamp,
    ) -> GovResult<()> {
        self.validate_transfer(&from, &to, amount)?;

        self.debit(&from, amount)?;
        self.credit(to, amount)?;

        self.events.emit(GovEvent::TokenTransfer {
            from,
            to,
            amount,
            timestamp: now,
        });

        Ok(())
    }

    /// Set the allowance from `owner` to `spender`.
    ///
    /// An amount of zero resets a previous approval.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: u64,
        now: Timestamp,
    ) -> GovResult<()> {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);

        self.events.emit(GovEvent::TokenApproval {
            owner,
            spender,
            amount,
            timestamp: now,
        });

        Ok(())
    }

    /// Transfer `amount` from `from` to `to`, spending `spender`'s
    /// allowance.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
        now: Timestamp,
    ) -> GovResult<()> {
        self.validate_transfer(&from, &to, amount)?;

        let allowance = self.allowance(&from, &spender);
        if allowance < amount {
            return Err(GovError::InsufficientAllowance {
                allowance,
                requested: amount,
            });
        }

        self.debit(&from, amount)?;
        self.credit(to, amount)?;
        self.allowances
            .entry(from)
            .or_default()
            .insert(spender, allowance - amount);

        self.events.emit(GovEvent::TokenTransfer {
            from,
            to,
            amount,
            timestamp: now,
        });

        Ok(())
    }

    // ============ Delegation ============

    /// Delegate the holder's voting weight to `to`.
    ///
    /// Re-delegation to a different representative is allowed at any
    /// time; the governance engine reads the mapping live.
    pub fn delegate(&mut self, holder: Address, to: Address, now: Timestamp) -> GovResult<()> {
        if to == holder {
            return Err(GovError::SelfDelegation { holder });
        }
        if to == [0u8; 32] {
            return Err(GovError::InvalidInput {
                param: "to",
                reason: "cannot delegate to the zero address",
            });
        }
        if self.delegations.get(&holder) == Some(&to) {
            return Err(GovError::InvalidInput {
                param: "to",
                reason: "already delegated to this address",
            });
        }

        self.delegations.insert(holder, to);

        self.events.emit(GovEvent::Delegated {
            delegator: holder,
            delegate: to,
            timestamp: now,
        });

        Ok(())
    }

    /// Remove the holder's delegation
    pub fn undelegate(&mut self, holder: Address, now: Timestamp) -> GovResult<()> {
        let previous = self
            .delegations
            .remove(&holder)
            .ok_or(GovError::InvalidInput {
                param: "holder",
                reason: "no active delegation",
            })?;

        self.events.emit(GovEvent::Undelegated {
            delegator: holder,
            previous_delegate: previous,
            timestamp: now,
        });

        Ok(())
    }

    // ============ Internal ============

    fn validate_transfer(&self, from: &Address, to: &Address, amount: u64) -> GovResult<()> {
        if amount == 0 {
            return Err(GovError::ZeroAmount);
        }
        if from == to {
            return Err(GovError::InvalidInput {
                param: "to",
                reason: "cannot transfer to self",
            });
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(GovError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        Ok(())
    }

    fn credit(&mut self, to: Address, amount: u64) -> GovResult<()> {
        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(GovError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, from: &Address, amount: u64) -> GovResult<()> {
        let balance = self
            .balances
            .get_mut(from)
            .ok_or(GovError::InsufficientBalance {
                available: 0,
                requested: amount,
            })?;
        *balance = balance.checked_sub(amount).ok_or(GovError::Overflow)?;
        Ok(())
    }
}

// ============ Tests ============
