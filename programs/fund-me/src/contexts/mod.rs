use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::*;

// ACCOUNTS - Instruction account validation structs

// ══════════════════════════════════════════════════════════════════════════════
// PRICE FEED
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Accounts)]
pub struct InitializePriceFeed<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + PriceFeed::LEN,
        seeds = [PRICE_FEED_SEED, authority.key().as_ref()],
        bump
    )]
    pub price_feed: Account<'info, PriceFeed>,
    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

/// Authority is checked in `PriceFeed::publish` so a wrong signer gets
/// UnauthorizedFeedUpdate rather than a seeds mismatch
#[derive(Accounts)]
pub struct UpdatePriceFeed<'info> {
    #[account(mut, seeds = [PRICE_FEED_SEED, price_feed.authority.as_ref()], bump = price_feed.bump)]
    pub price_feed: Account<'info, PriceFeed>,
    pub authority: Signer<'info>,
}

// ══════════════════════════════════════════════════════════════════════════════
// LEDGER
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + FundMe::LEN,
        seeds = [FUND_ME_SEED, owner.key().as_ref()],
        bump
    )]
    pub fund_me: Account<'info, FundMe>,
    /// Feed this ledger prices contributions with, bound for its lifetime
    pub price_feed: Account<'info, PriceFeed>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Fund<'info> {
    #[account(mut, seeds = [FUND_ME_SEED, fund_me.owner.as_ref()], bump = fund_me.bump)]
    pub fund_me: Account<'info, FundMe>,
    #[account(address = fund_me.price_feed @ ErrorCode::InvalidPriceFeed)]
    pub price_feed: Account<'info, PriceFeed>,
    #[account(mut)]
    pub funder: Signer<'info>,
    pub system_program: Program<'info, System>,
}

/// Shared by `withdraw` and `cheaper_withdraw`.
/// Ownership is checked in `FundMe::withdraw` so a non-owner caller gets
/// NotOwner; the payout goes to the caller once it is known to be the owner.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut, seeds = [FUND_ME_SEED, fund_me.owner.as_ref()], bump = fund_me.bump)]
    pub fund_me: Account<'info, FundMe>,
    #[account(mut)]
    pub caller: Signer<'info>,
}

// ══════════════════════════════════════════════════════════════════════════════
// READS
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Accounts)]
pub struct ReadLedger<'info> {
    #[account(seeds = [FUND_ME_SEED, fund_me.owner.as_ref()], bump = fund_me.bump)]
    pub fund_me: Account<'info, FundMe>,
}

#[derive(Accounts)]
pub struct ReadPrice<'info> {
    #[account(seeds = [FUND_ME_SEED, fund_me.owner.as_ref()], bump = fund_me.bump)]
    pub fund_me: Account<'info, FundMe>,
    #[account(address = fund_me.price_feed @ ErrorCode::InvalidPriceFeed)]
    pub price_feed: Account<'info, PriceFeed>,
}
