use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::helpers::oracle::{get_conversion_rate, PriceOracle};

/// One contributor of the current funding epoch
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunderRecord {
    pub funder: Pubkey,
    /// Lamports contributed this epoch
    pub amount: u64,
}

impl FunderRecord {
    pub const LEN: usize = 32 + 8;
}

/// Accepted contribution, as reported by `FundMe::fund`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub usd_value: u128,
    pub funder_balance: u64,
    pub total_held: u64,
}

/// Completed withdrawal, as reported by `FundMe::withdraw`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    /// Sum of the cleared contributor balances
    pub released: u64,
    /// Lamports actually paid to the owner
    pub paid: u64,
    pub funders_cleared: u32,
    /// Epoch that starts after this withdrawal
    pub epoch: u64,
}

/// FundMe ledger
///
/// Holds the contributor balances of the current funding epoch and the
/// immutable owner / price feed binding. Contributed lamports sit on this
/// account itself, above its rent-exempt reserve.
///
/// The contributor list is de-duplicated: a funder appears once, at the
/// position of their first contribution in the epoch, and `amount` is the
/// running total. Looking a funder up in the list is the balance map.
///
/// PDA Seeds: ["fund_me", owner]
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct FundMe {
    /// Only key allowed to withdraw. Set once.
    pub owner: Pubkey,

    /// Price feed account bound at construction. Set once.
    pub price_feed: Pubkey,

    /// Minimum contribution, USD with 18 decimals
    pub minimum_usd: u128,

    /// Oldest usable price round, in seconds
    pub max_price_age: i64,

    /// Sum of all contributor balances
    pub total_held: u64,

    /// Lamports paid to the owner over the ledger's lifetime
    pub total_withdrawn: u64,

    /// Completed withdrawals
    pub epoch: u64,

    /// Timestamp when the ledger was created
    pub created_at: i64,

    /// PDA bump seed
    pub bump: u8,

    /// Contributors of the current epoch, in first-funded order
    pub funders: Vec<FunderRecord>,
}

impl FundMe {
    /// Account size calculation:
    /// - owner, price_feed: 32 * 2 = 64 bytes
    /// - minimum_usd: 16 bytes (u128)
    /// - max_price_age, total_held, total_withdrawn, epoch, created_at: 8 * 5 = 40 bytes
    /// - bump: 1 byte
    /// - funders: 4 byte length prefix + MAX_FUNDERS * 40 bytes
    /// Total: 5245 bytes with MAX_FUNDERS = 128
    pub const LEN: usize = 32 * 2 + 16 + 8 * 5 + 1 + 4 + MAX_FUNDERS * FunderRecord::LEN;

    pub fn new(
        owner: Pubkey,
        price_feed: Pubkey,
        minimum_usd: u128,
        max_price_age: i64,
        created_at: i64,
        bump: u8,
    ) -> Self {
        Self {
            owner,
            price_feed,
            minimum_usd,
            max_price_age,
            total_held: 0,
            total_withdrawn: 0,
            epoch: 0,
            created_at,
            bump,
            funders: Vec::new(),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // FUNDING
    // ══════════════════════════════════════════════════════════════════════

    /// Record a contribution of `amount` lamports from `funder`.
    ///
    /// Nothing is written unless every check passes, so a rejected
    /// contribution leaves the ledger untouched.
    pub fn fund<O: PriceOracle + ?Sized>(
        &mut self,
        funder: Pubkey,
        amount: u64,
        oracle: &O,
        now: i64,
    ) -> Result<Contribution> {
        let usd_value = get_conversion_rate(oracle, amount, now, self.max_price_age)?;
        require!(usd_value >= self.minimum_usd, ErrorCode::InsufficientContribution);

        let total_held = self.total_held.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;

        let funder_balance = match self.funders.iter_mut().find(|r| r.funder == funder) {
            Some(record) => {
                record.amount = record.amount.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
                record.amount
            }
            None => {
                require!(self.funders.len() < MAX_FUNDERS, ErrorCode::FunderLimitReached);
                self.funders.push(FunderRecord { funder, amount });
                amount
            }
        };
        self.total_held = total_held;

        Ok(Contribution {
            usd_value,
            funder_balance,
            total_held,
        })
    }

    // ══════════════════════════════════════════════════════════════════════
    // WITHDRAWAL
    // ══════════════════════════════════════════════════════════════════════

    /// Owner-only drain of the current epoch.
    ///
    /// Zeroes each contributor balance in list order, clears the list and
    /// starts a new epoch, then hands the already-reset ledger to `payout`,
    /// which moves the funds and returns the lamports paid. If `payout`
    /// fails the ledger is restored exactly and the error is returned.
    pub fn withdraw<F>(&mut self, caller: &Pubkey, payout: F) -> Result<Withdrawal>
    where
        F: FnOnce(&FundMe) -> Result<u64>,
    {
        require_keys_eq!(*caller, self.owner, ErrorCode::NotOwner);

        let snapshot = self.clone();
        let result = self
            .zero_balances()
            .and_then(|(released, cleared)| self.settle(released, cleared, payout));

        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Same outcome as `withdraw`. Takes the contributor list into a local
    /// working copy once and persists the cleared ledger in one step; the
    /// working copy doubles as the rollback state.
    pub fn cheaper_withdraw<F>(&mut self, caller: &Pubkey, payout: F) -> Result<Withdrawal>
    where
        F: FnOnce(&FundMe) -> Result<u64>,
    {
        require_keys_eq!(*caller, self.owner, ErrorCode::NotOwner);

        let funders = std::mem::take(&mut self.funders);
        let (total_held, epoch, total_withdrawn) = (self.total_held, self.epoch, self.total_withdrawn);

        let result = funders
            .iter()
            .try_fold(0u64, |sum, record| sum.checked_add(record.amount))
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
            .and_then(|released| self.settle(released, funders.len() as u32, payout));

        if result.is_err() {
            self.funders = funders;
            self.total_held = total_held;
            self.epoch = epoch;
            self.total_withdrawn = total_withdrawn;
        }
        result
    }

    /// Zero every listed balance, then clear the list.
    /// Returns (released lamports, contributors cleared).
    fn zero_balances(&mut self) -> Result<(u64, u32)> {
        let mut released: u64 = 0;
        let mut index = 0;
        while index < self.funders.len() {
            let record = &mut self.funders[index];
            released = released.checked_add(record.amount).ok_or(ErrorCode::MathOverflow)?;
            record.amount = 0;
            index += 1;
        }

        let cleared = self.funders.len() as u32;
        self.funders.clear();
        Ok((released, cleared))
    }

    /// Close the epoch, then run the payout against the reset ledger
    fn settle<F>(&mut self, released: u64, funders_cleared: u32, payout: F) -> Result<Withdrawal>
    where
        F: FnOnce(&FundMe) -> Result<u64>,
    {
        self.total_held = 0;
        self.epoch = self.epoch.checked_add(1).ok_or(ErrorCode::MathOverflow)?;

        let paid = payout(self)?;
        self.total_withdrawn = self.total_withdrawn.saturating_add(paid);

        Ok(Withdrawal {
            released,
            paid,
            funders_cleared,
            epoch: self.epoch,
        })
    }

    // ══════════════════════════════════════════════════════════════════════
    // READS
    // ══════════════════════════════════════════════════════════════════════

    /// Lamports contributed by `funder` this epoch; 0 if unknown
    pub fn funder_balance(&self, funder: &Pubkey) -> u64 {
        self.funders
            .iter()
            .find(|r| r.funder == *funder)
            .map_or(0, |r| r.amount)
    }

    pub fn funder(&self, index: u64) -> Result<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.funders.get(i))
            .map(|r| r.funder)
            .ok_or_else(|| error!(ErrorCode::IndexOutOfRange))
    }

    pub fn funders_count(&self) -> u32 {
        self.funders.len() as u32
    }

    /// Sum of the per-contributor balances
    #[cfg(test)]
    pub fn sum_of_balances(&self) -> u128 {
        self.funders.iter().map(|r| r.amount as u128).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.funders.is_empty() && self.total_held == 0
    }
}
