//! Integration Tests
//!
//! End-to-end lifecycle scenarios across the token ledger and the
//! governance engine, driven with the default (genesis) configuration
//! and an explicitly advanced clock.

use crate::{Governance, ProposalAction, QuorumChange};
use agora_common::constants::token::ONE;
use agora_common::errors::GovError;
use agora_common::types::{Address, GovernanceConfig, ProposalPhase, Timestamp};
use agora_gov_token::GovToken;

const T0: Timestamp = 1_612_274_437;

fn governance_address() -> Address {
    [0xAAu8; 32]
}

fn delegate() -> Address {
    [1u8; 32]
}

fn delegator() -> Address {
    [2u8; 32]
}

fn whale() -> Address {
    [3u8; 32]
}

/// Genesis deployment: default config, a delegator holding just over the
/// proposal threshold, and a whale that can carry quorum on its own.
fn deploy() -> (Governance, GovToken) {
    let mut gov = Governance::new(governance_address(), GovernanceConfig::default()).unwrap();
    let mut token = GovToken::new();

    token.mint(delegator(), 1_500 * ONE, T0).unwrap();
    token.mint(whale(), 800_000 * ONE, T0).unwrap();

    // The delegator locks enough weight to propose and hands it to the
    // delegate.
    token
        .approve(delegator(), gov.address(), 1_200 * ONE, T0)
        .unwrap();
    gov.lock_with_approval(&mut token, delegator(), 1_200 * ONE, T0)
        .unwrap();
    token.delegate(delegator(), delegate(), T0).unwrap();

    (gov, token)
}

fn lock(gov: &mut Governance, token: &mut GovToken, owner: Address, amount: u64, now: Timestamp) {
    token.approve(owner, gov.address(), amount, now).unwrap();
    gov.lock_with_approval(token, owner, amount, now).unwrap();
}

fn lower_quorum_action() -> Box<dyn ProposalAction> {
    Box::new(QuorumChange {
        new_quorum: 15_000 * ONE,
    })
}

#[test]
fn test_lower_vote_quorum_lifecycle() {
    let (mut gov, mut token) = deploy();
    let mut now = T0;

    assert_eq!(gov.proposal_count(), 0);
    assert_eq!(gov.quorum_votes(), 25_000 * ONE);

    // == Propose ==

    let id = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();

    assert_eq!(id, 1);
    assert_eq!(gov.proposal_count(), 1);
    assert_eq!(gov.phase(id, now).unwrap(), ProposalPhase::Pending);

    // == Vote ==

    // The whale locks 25k and votes once the delay has elapsed
    lock(&mut gov, &mut token, whale(), 25_000 * ONE, now);

    now += gov.voting_delay() + 1;
    assert_eq!(gov.phase(id, now).unwrap(), ProposalPhase::Active);
    gov.cast_vote(whale(), id, true, now).unwrap();

    // == Execute ==

    now += gov.voting_period() + gov.execution_delay();
    assert_eq!(gov.phase(id, now).unwrap(), ProposalPhase::Executable);
    gov.execute(id, now).unwrap();

    // The protocol amended its own quorum
    assert_eq!(gov.quorum_votes(), 15_000 * ONE);
    assert_eq!(gov.phase(id, now).unwrap(), ProposalPhase::Executed);
}

#[test]
fn test_quorum_not_reached() {
    let (mut gov, mut token) = deploy();
    let mut now = T0;

    let id = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();

    // Only 10k locked: below the 25k quorum
    lock(&mut gov, &mut token, whale(), 10_000 * ONE, now);

    now += gov.voting_delay() + 1;
    gov.cast_vote(whale(), id, true, now).unwrap();

    now += gov.voting_period() + gov.execution_delay();
    let result = gov.execute(id, now);
    assert!(matches!(
        result,
        Err(GovError::NotExecutable {
            phase: ProposalPhase::Defeated,
            ..
        })
    ));
    assert!(!result.unwrap_err().is_retryable());

    // Waiting longer changes nothing: Defeated is terminal
    now += 365 * 86_400;
    assert_eq!(gov.phase(id, now).unwrap(), ProposalPhase::Defeated);
    assert_eq!(gov.quorum_votes(), 25_000 * ONE);
}

#[test]
fn test_proposals_are_independent() {
    let (mut gov, mut token) = deploy();
    let mut now = T0;

    // Second proposer with its own locked weight
    let other = [4u8; 32];
    token.mint(other, 2_000 * ONE, now).unwrap();
    lock(&mut gov, &mut token, other, 2_000 * ONE, now);

    let first = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();
    let second = gov
        .propose(
            other,
            Box::new(QuorumChange {
                new_quorum: 20_000 * ONE,
            }),
            "Change the vote quorum from 25k to 20k AGORA.",
            now,
        )
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);

    lock(&mut gov, &mut token, whale(), 30_000 * ONE, now);

    now += gov.voting_delay() + 1;
    gov.cast_vote(whale(), first, true, now).unwrap();

    // Voting on the first proposal leaves the second's tally untouched
    assert_eq!(gov.proposal(first).unwrap().for_votes, 30_000 * ONE);
    assert_eq!(gov.proposal(second).unwrap().for_votes, 0);

    now += gov.voting_period() + gov.execution_delay();
    gov.execute(first, now).unwrap();

    // Executing the first defeats neither the second's record nor its
    // (empty) tally
    assert_eq!(gov.quorum_votes(), 15_000 * ONE);
    assert!(!gov.proposal(second).unwrap().executed);
    assert_eq!(gov.proposal(second).unwrap().for_votes, 0);
    assert_eq!(gov.phase(second, now).unwrap(), ProposalPhase::Defeated);
}

#[test]
fn test_whale_can_unlock_after_window() {
    let (mut gov, mut token) = deploy();
    let mut now = T0;

    let id = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();

    lock(&mut gov, &mut token, whale(), 25_000 * ONE, now);

    now += gov.voting_delay() + 1;
    gov.cast_vote(whale(), id, true, now).unwrap();

    // Voting pinned the whale's tokens until the execution window opens
    let result = gov.unlock(&mut token, whale(), 25_000 * ONE, now);
    assert!(matches!(result, Err(GovError::WithdrawalLocked { .. })));

    now += gov.voting_period() + gov.execution_delay();
    gov.execute(id, now).unwrap();

    gov.unlock(&mut token, whale(), 25_000 * ONE, now).unwrap();
    assert_eq!(token.balance_of(&whale()), 800_000 * ONE);
    assert_eq!(gov.locked_balance(&whale()), 0);

    // The vote record persists for audit even after the exit
    assert_eq!(gov.receipt(id, &whale()).unwrap().weight, 25_000 * ONE);
}

#[test]
fn test_delegated_weight_bounded_by_supply() {
    let (mut gov, mut token) = deploy();
    let now = T0;

    // Several holders lock and delegate to the same representative
    let holders: [Address; 3] = [[10u8; 32], [11u8; 32], [12u8; 32]];
    for holder in holders {
        token.mint(holder, 5_000 * ONE, now).unwrap();
        lock(&mut gov, &mut token, holder, 4_000 * ONE, now);
        token.delegate(holder, delegate(), now).unwrap();
    }

    // The delegate's effective weight is the sum of its delegators'
    // locked balances, necessarily bounded by total supply
    let effective: u64 = holders.iter().map(|h| gov.locked_balance(h)).sum();
    assert_eq!(effective, 12_000 * ONE);
    assert!(effective <= token.total_supply());
    assert!(gov.total_locked() <= token.total_supply());
}

#[test]
fn test_defeated_proposer_can_repropose() {
    let (mut gov, token) = deploy();
    let mut now = T0;

    let first = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();

    // Nobody votes: the proposal is defeated at the end of voting
    now += gov.voting_delay() + gov.voting_period();
    assert_eq!(gov.phase(first, now).unwrap(), ProposalPhase::Defeated);

    // A defeated proposal is archived, not resurrected: the same change
    // goes in again under a fresh id
    let second = gov
        .propose_by_delegate(
            &token,
            delegate(),
            delegator(),
            lower_quorum_action(),
            "Change the vote quorum from 25k to 15k AGORA.",
            now,
        )
        .unwrap();

    assert_eq!(second, 2);
    assert_eq!(gov.proposal_count(), 2);
    assert_eq!(gov.phase(first, now).unwrap(), ProposalPhase::Defeated);
}
