use anchor_lang::prelude::*;

/// FundMe Error Codes
///
/// Every failing instruction reverts all of its account changes, so each
/// code below describes a rejected call, never a partially applied one.
#[error_code]
pub enum ErrorCode {
    // Funding
    #[msg("Contribution is below the USD minimum")]
    InsufficientContribution,

    #[msg("Contributor list is full - owner must withdraw first")]
    FunderLimitReached,

    // Access control
    #[msg("Only the owner can withdraw")]
    NotOwner,

    #[msg("Only the feed authority can publish prices")]
    UnauthorizedFeedUpdate,

    // Reads
    #[msg("Funder index out of range")]
    IndexOutOfRange,

    // Withdrawal
    #[msg("Transfer to owner failed")]
    TransferFailure,

    // Oracle
    #[msg("Price feed unavailable or stale")]
    OracleUnavailable,

    #[msg("Invalid price feed")]
    InvalidPriceFeed,

    #[msg("Arithmetic overflow")]
    MathOverflow,
}
