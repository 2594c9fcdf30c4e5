//! Protocol Constants
//!
//! All magic numbers and default configuration values for the Agora
//! governance protocol. Timing values mirror the deployment the protocol
//! was parameterized from: a short admission delay, a multi-day voting
//! window, and a mandatory review period before execution.

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Agora";
    /// Token symbol
    pub const SYMBOL: &str = "AGORA";
    /// Decimal places
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 AGORA = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Governance Timing & Thresholds
///
/// These are genesis values. `QUORUM_VOTES` in particular is only a
/// starting point: a successfully executed proposal may amend the live
/// quorum at runtime through `GovernanceConfig`.
pub mod governance {
    use super::time::SECONDS_PER_DAY;
    use super::token::ONE;

    /// Delay between proposal creation and the start of voting.
    /// Only long enough to keep creation and the first vote out of the
    /// same ledger step.
    pub const VOTING_DELAY: u64 = 75;

    /// Length of the voting window (3 days)
    pub const VOTING_PERIOD: u64 = 3 * SECONDS_PER_DAY;

    /// Mandatory review period between voting close and permitted
    /// execution (2 days)
    pub const EXECUTION_DELAY: u64 = 2 * SECONDS_PER_DAY;

    /// Minimum aggregate "for" weight for a proposal to succeed
    /// (25,000 AGORA)
    pub const QUORUM_VOTES: u64 = 25_000 * ONE;

    /// Minimum locked weight required to create a proposal (1,000 AGORA)
    pub const PROPOSAL_THRESHOLD: u64 = 1_000 * ONE;
}

/// Token Supply
pub mod supply {
    use super::token::ONE;

    /// Genesis supply (10M AGORA)
    pub const INITIAL_SUPPLY: u64 = 10_000_000 * ONE;

    /// Hard cap on total supply
    /// 100_000_000 * 100_000_000 = 10^16, far below u64::MAX, so vote
    /// tallies can never overflow a u64 even if every token votes.
    pub const MAX_SUPPLY: u64 = 100_000_000 * ONE;
}

/// Time-related constants
pub mod time {
    /// Seconds per hour
    pub const SECONDS_PER_HOUR: u64 = 3_600;

    /// Seconds per day
    pub const SECONDS_PER_DAY: u64 = 86_400;
}
