// ══════════════════════════════════════════════════════════════════════════════
// PDA SEEDS
// ══════════════════════════════════════════════════════════════════════════════

/// FundMe ledger PDA seed: ["fund_me", owner]
pub const FUND_ME_SEED: &[u8] = b"fund_me";

/// Price feed PDA seed: ["price_feed", authority]
pub const PRICE_FEED_SEED: &[u8] = b"price_feed";

// ══════════════════════════════════════════════════════════════════════════════
// FIXED-POINT DECIMALS
// ══════════════════════════════════════════════════════════════════════════════

/// Lamports per SOL exponent
pub const NATIVE_DECIMALS: u8 = 9;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// USD amounts are normalized to 18 decimals
pub const USD_DECIMALS: u8 = 18;

/// Highest feed precision the adapter accepts
pub const MAX_FEED_DECIMALS: u8 = USD_DECIMALS;

// ══════════════════════════════════════════════════════════════════════════════
// FUNDING POLICY
// ══════════════════════════════════════════════════════════════════════════════

/// Minimum contribution: $50, 18-decimal fixed point
pub const MINIMUM_USD: u128 = 50 * 10u128.pow(USD_DECIMALS as u32);

/// Maximum distinct contributors per funding epoch.
/// Bounds the ledger account size; a full ledger rejects new contributors
/// until the owner withdraws.
pub const MAX_FUNDERS: usize = 128;

// ══════════════════════════════════════════════════════════════════════════════
// MOCK AGGREGATOR DEFAULTS (local clusters)
// ══════════════════════════════════════════════════════════════════════════════

/// Decimals used by the locally deployed mock feed
pub const MOCK_DECIMALS: u8 = 8;

/// Initial mock answer: $2000 per SOL at 8 decimals
pub const MOCK_INITIAL_ANSWER: i64 = 200_000_000_000;

/// Aggregator interface version reported by `get_version`
pub const PRICE_FEED_VERSION: u8 = 4;

// ══════════════════════════════════════════════════════════════════════════════
// ORACLE FRESHNESS
// ══════════════════════════════════════════════════════════════════════════════
// Build with: anchor build -- --features testing (localnet, mock feed)
// Build with: anchor build (devnet/mainnet - staleness enforced)
//
// When testing:
//   - A round stays usable for 30 days, so a mock pushed once at deploy
//     time does not expire mid-session
// When production:
//   - Rounds older than one hour block `fund` with OracleUnavailable

/// Maximum age of a price round, in seconds
#[cfg(feature = "testing")]
pub const MAX_PRICE_AGE: i64 = 30 * 24 * 60 * 60;
#[cfg(not(feature = "testing"))]
pub const MAX_PRICE_AGE: i64 = 60 * 60;
