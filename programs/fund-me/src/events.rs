use anchor_lang::prelude::*;

// ══════════════════════════════════════════════════════════════════════════════
// INITIALIZATION EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when a FundMe ledger is created
#[event]
pub struct FundMeInitialized {
    pub owner: Pubkey,
    pub price_feed: Pubkey,
    pub minimum_usd: u128,
    pub timestamp: i64,
}

/// Emitted when a price feed (mock aggregator) is created
#[event]
pub struct PriceFeedInitialized {
    pub price_feed: Pubkey,
    pub authority: Pubkey,
    pub decimals: u8,
    pub answer: i64,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// ORACLE EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when the feed authority publishes a new round
#[event]
pub struct PriceUpdated {
    pub price_feed: Pubkey,
    pub round_id: u64,
    pub answer: i64,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// LEDGER EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted for every accepted contribution
#[event]
pub struct Funded {
    pub funder: Pubkey,
    pub amount: u64,
    pub usd_value: u128,
    pub funder_balance: u64,
    pub total_held: u64,
    pub epoch: u64,
    pub timestamp: i64,
}

/// Emitted when the owner drains the ledger
#[event]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    pub funders_cleared: u32,
    pub epoch: u64,
    pub cheaper: bool,
    pub timestamp: i64,
}
