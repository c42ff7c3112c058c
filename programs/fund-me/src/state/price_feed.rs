use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::ErrorCode;

/// Push-style price aggregator
///
/// Exposes the `{decimals, latestAnswer}` capability the ledger prices
/// contributions with. On local clusters the deployer creates one with
/// `MOCK_DECIMALS` / `MOCK_INITIAL_ANSWER` and it acts as the mock feed;
/// elsewhere an off-chain relayer holding `authority` publishes rounds.
///
/// PDA Seeds: ["price_feed", authority]
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct PriceFeed {
    /// Only key allowed to publish rounds
    pub authority: Pubkey,

    /// Decimals of `answer` (8 for USD pairs)
    pub decimals: u8,

    /// Latest answer, USD per SOL scaled by `decimals`
    pub answer: i64,

    /// Incremented on every published round
    pub round_id: u64,

    /// Unix timestamp of the latest round
    pub updated_at: i64,

    /// Aggregator interface version
    pub version: u8,

    /// PDA bump seed
    pub bump: u8,
}

impl PriceFeed {
    /// Account size calculation:
    /// - authority: 32 bytes (Pubkey)
    /// - decimals: 1 byte
    /// - answer: 8 bytes (i64)
    /// - round_id: 8 bytes (u64)
    /// - updated_at: 8 bytes (i64)
    /// - version: 1 byte
    /// - bump: 1 byte
    /// Total: 59 bytes
    pub const LEN: usize = 32 + 1 + 8 + 8 + 8 + 1 + 1;

    pub fn new(authority: Pubkey, decimals: u8, initial_answer: i64, now: i64, bump: u8) -> Result<Self> {
        require!(decimals <= MAX_FEED_DECIMALS, ErrorCode::InvalidPriceFeed);
        require!(initial_answer > 0, ErrorCode::InvalidPriceFeed);

        Ok(Self {
            authority,
            decimals,
            answer: initial_answer,
            round_id: 1,
            updated_at: now,
            version: PRICE_FEED_VERSION,
            bump,
        })
    }

    /// Publish a new round. Returns the new round id.
    pub fn publish(&mut self, signer: &Pubkey, answer: i64, now: i64) -> Result<u64> {
        require_keys_eq!(*signer, self.authority, ErrorCode::UnauthorizedFeedUpdate);
        require!(answer > 0, ErrorCode::InvalidPriceFeed);

        let round_id = self.round_id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        self.answer = answer;
        self.round_id = round_id;
        self.updated_at = now;
        Ok(round_id)
    }
}
