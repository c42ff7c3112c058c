use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::PriceFeed;

/// One price observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceData {
    pub answer: i64,
    pub decimals: u8,
    pub updated_at: i64,
}

/// Anything that can quote SOL in USD with a fixed decimal count
pub trait PriceOracle {
    fn decimals(&self) -> u8;

    /// Latest round as seen at `now`
    fn latest_round(&self, now: i64) -> PriceData;
}

impl PriceOracle for PriceFeed {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn latest_round(&self, _now: i64) -> PriceData {
        PriceData {
            answer: self.answer,
            decimals: self.decimals,
            updated_at: self.updated_at,
        }
    }
}

/// Constant quote. Never ages.
///
/// Test fixture only: a ledger can bind nothing but a `PriceFeed` account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPrice {
    pub answer: i64,
    pub decimals: u8,
}

impl FixedPrice {
    pub const fn new(answer: i64, decimals: u8) -> Self {
        Self { answer, decimals }
    }

    /// $2000 at 8 decimals, same as the local mock feed
    pub const fn mock() -> Self {
        Self::new(MOCK_INITIAL_ANSWER, MOCK_DECIMALS)
    }
}

impl PriceOracle for FixedPrice {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn latest_round(&self, now: i64) -> PriceData {
        PriceData {
            answer: self.answer,
            decimals: self.decimals,
            updated_at: now,
        }
    }
}

/// Read the latest round and reject it unless it is usable:
/// positive answer, published at least once, no older than `max_age`
pub fn fresh_price<O: PriceOracle + ?Sized>(oracle: &O, now: i64, max_age: i64) -> Result<PriceData> {
    require!(oracle.decimals() <= MAX_FEED_DECIMALS, ErrorCode::InvalidPriceFeed);

    let round = oracle.latest_round(now);
    require!(round.answer > 0, ErrorCode::OracleUnavailable);
    require!(round.updated_at > 0, ErrorCode::OracleUnavailable);

    let age = now.saturating_sub(round.updated_at);
    if age > max_age {
        msg!("Price round is {}s old (max {}s)", age, max_age);
        return err!(ErrorCode::OracleUnavailable);
    }

    Ok(round)
}

/// Convert lamports to USD, 18-decimal fixed point
///
/// usd = lamports * 10^(18-9) * answer * 10^(18-feed_decimals) / 10^18
///     = lamports * answer * 10^(18 - 9 - feed_decimals)
pub fn convert_to_usd(native_amount: u64, price: &PriceData) -> Result<u128> {
    require!(price.answer > 0, ErrorCode::OracleUnavailable);
    require!(price.decimals <= MAX_FEED_DECIMALS, ErrorCode::InvalidPriceFeed);

    let raw = (native_amount as u128)
        .checked_mul(price.answer as u128)
        .ok_or(ErrorCode::MathOverflow)?;

    let scale = USD_DECIMALS as i32 - NATIVE_DECIMALS as i32 - price.decimals as i32;
    let factor = 10u128.pow(scale.unsigned_abs());

    let usd = if scale >= 0 {
        raw.checked_mul(factor).ok_or(ErrorCode::MathOverflow)?
    } else {
        raw / factor
    };

    #[cfg(feature = "verbose")]
    msg!("convert_to_usd: lamports={}, answer={}, decimals={}, usd={}", native_amount, price.answer, price.decimals, usd);

    Ok(usd)
}

/// `fresh_price` followed by `convert_to_usd`
pub fn get_conversion_rate<O: PriceOracle + ?Sized>(
    oracle: &O,
    native_amount: u64,
    now: i64,
    max_age: i64,
) -> Result<u128> {
    let price = fresh_price(oracle, now, max_age)?;
    convert_to_usd(native_amount, &price)
}

/// Split an 18-decimal USD value into (dollars, cents) for logs
pub fn format_usd(usd: u128) -> (u128, u128) {
    let unit = 10u128.pow(USD_DECIMALS as u32);
    (usd / unit, (usd % unit) / 10u128.pow(USD_DECIMALS as u32 - 2))
}
