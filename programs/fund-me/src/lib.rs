use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod state;

mod formal_verification;

pub use constants::*;
pub use contexts::*;
pub use errors::ErrorCode;
pub use events::*;
pub use helpers::*;
pub use state::*;

declare_id!("5k3PwpptqiLdUocfPHRTrDvvyVD5T5k4wnJrcL27jW7h");

/// Shared body of `withdraw` and `cheaper_withdraw` (extracted to keep the
/// two entry points identical apart from the ledger strategy)
#[inline(never)]
fn drain_ledger(ctx: Context<Withdraw>, cheaper: bool) -> Result<()> {
    let clock = Clock::get()?;
    let rent = Rent::get()?;

    let caller = ctx.accounts.caller.key();
    let vault = ctx.accounts.fund_me.to_account_info();
    let recipient = ctx.accounts.caller.to_account_info();

    // Runs only after the ledger has been reset
    let payout = |_: &FundMe| release_excess_lamports(&vault, &recipient, &rent);

    let ledger = &mut ctx.accounts.fund_me;
    let receipt = if cheaper {
        ledger.cheaper_withdraw(&caller, payout)?
    } else {
        ledger.withdraw(&caller, payout)?
    };

    msg!(
        "Withdrawn {} lamports ({}.{:09} SOL) to owner, {} funders cleared, epoch {}",
        receipt.paid,
        receipt.paid / constants::LAMPORTS_PER_SOL,
        receipt.paid % constants::LAMPORTS_PER_SOL,
        receipt.funders_cleared,
        receipt.epoch
    );

    #[cfg(feature = "verbose")]
    msg!("Ledger released {} lamports, paid {}", receipt.released, receipt.paid);

    emit!(Withdrawn {
        owner: caller,
        amount: receipt.paid,
        funders_cleared: receipt.funders_cleared,
        epoch: receipt.epoch,
        cheaper,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[program]
pub mod fund_me {
    use super::*;

    // ══════════════════════════════════════════════════════════════════════
    // PRICE FEED
    // ══════════════════════════════════════════════════════════════════════

    /// Create a price feed owned by the signer. On local clusters this is
    /// the mock aggregator (MOCK_DECIMALS, MOCK_INITIAL_ANSWER).
    pub fn initialize_price_feed(
        ctx: Context<InitializePriceFeed>,
        decimals: u8,
        initial_answer: i64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let authority = ctx.accounts.authority.key();

        let feed = PriceFeed::new(
            authority,
            decimals,
            initial_answer,
            clock.unix_timestamp,
            ctx.bumps.price_feed,
        )?;
        ctx.accounts.price_feed.set_inner(feed);

        msg!("Price feed initialized: answer={} decimals={}", initial_answer, decimals);

        emit!(PriceFeedInitialized {
            price_feed: ctx.accounts.price_feed.key(),
            authority,
            decimals,
            answer: initial_answer,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Publish a new round (feed authority only)
    pub fn update_price_feed(ctx: Context<UpdatePriceFeed>, answer: i64) -> Result<()> {
        let clock = Clock::get()?;
        let signer = ctx.accounts.authority.key();

        let feed = &mut ctx.accounts.price_feed;
        let round_id = feed.publish(&signer, answer, clock.unix_timestamp)?;

        #[cfg(feature = "verbose")]
        msg!("Price round {}: answer={}", round_id, answer);

        emit!(PriceUpdated {
            price_feed: feed.key(),
            round_id,
            answer,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // LEDGER
    // ══════════════════════════════════════════════════════════════════════

    /// Create the ledger. The signer becomes the owner and the passed feed
    /// is bound for the ledger's lifetime.
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        let clock = Clock::get()?;
        let owner = ctx.accounts.owner.key();
        let price_feed = ctx.accounts.price_feed.key();

        ctx.accounts.fund_me.set_inner(FundMe::new(
            owner,
            price_feed,
            MINIMUM_USD,
            MAX_PRICE_AGE,
            clock.unix_timestamp,
            ctx.bumps.fund_me,
        ));

        msg!("FundMe initialized: owner={} feed={}", owner, price_feed);

        emit!(FundMeInitialized {
            owner,
            price_feed,
            minimum_usd: MINIMUM_USD,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Contribute `amount` lamports. Rejected below MINIMUM_USD at the
    /// current feed price; the transfer happens only once the ledger has
    /// accepted the contribution.
    pub fn fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
        let clock = Clock::get()?;
        let funder = ctx.accounts.funder.key();

        let receipt = ctx.accounts.fund_me.fund(
            funder,
            amount,
            &*ctx.accounts.price_feed,
            clock.unix_timestamp,
        )?;

        deposit_lamports(
            &ctx.accounts.funder.to_account_info(),
            &ctx.accounts.fund_me.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            amount,
        )?;

        let (dollars, cents) = format_usd(receipt.usd_value);
        msg!("Funded {} lamports (${}.{:02}) from {}", amount, dollars, cents, funder);

        emit!(Funded {
            funder,
            amount,
            usd_value: receipt.usd_value,
            funder_balance: receipt.funder_balance,
            total_held: receipt.total_held,
            epoch: ctx.accounts.fund_me.epoch,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Owner-only: reset every contributor balance, then pay out
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        drain_ledger(ctx, false)
    }

    /// Owner-only: same outcome as `withdraw` with a single pass over the
    /// contributor list
    pub fn cheaper_withdraw(ctx: Context<Withdraw>) -> Result<()> {
        drain_ledger(ctx, true)
    }

    // ══════════════════════════════════════════════════════════════════════
    // READS (values returned through return data)
    // ══════════════════════════════════════════════════════════════════════

    pub fn get_funder_balance(ctx: Context<ReadLedger>, funder: Pubkey) -> Result<u64> {
        Ok(ctx.accounts.fund_me.funder_balance(&funder))
    }

    pub fn get_funder(ctx: Context<ReadLedger>, index: u64) -> Result<Pubkey> {
        ctx.accounts.fund_me.funder(index)
    }

    pub fn get_funders_count(ctx: Context<ReadLedger>) -> Result<u32> {
        Ok(ctx.accounts.fund_me.funders_count())
    }

    pub fn get_price_feed(ctx: Context<ReadLedger>) -> Result<Pubkey> {
        Ok(ctx.accounts.fund_me.price_feed)
    }

    pub fn get_owner(ctx: Context<ReadLedger>) -> Result<Pubkey> {
        Ok(ctx.accounts.fund_me.owner)
    }

    pub fn get_minimum_usd(ctx: Context<ReadLedger>) -> Result<u128> {
        Ok(ctx.accounts.fund_me.minimum_usd)
    }

    /// USD value (18 decimals) of `amount` lamports at the bound feed's price
    pub fn get_conversion_rate(ctx: Context<ReadPrice>, amount: u64) -> Result<u128> {
        let clock = Clock::get()?;
        helpers::oracle::get_conversion_rate(
            &*ctx.accounts.price_feed,
            amount,
            clock.unix_timestamp,
            ctx.accounts.fund_me.max_price_age,
        )
    }

    pub fn get_version(ctx: Context<ReadPrice>) -> Result<u8> {
        Ok(ctx.accounts.price_feed.version)
    }
}
