use anchor_lang::prelude::*;
use anchor_lang::system_program;
use crate::errors::ErrorCode;

/// Move `amount` lamports from a wallet into the ledger account via the
/// system program (the payer must sign the transaction)
#[inline(never)]
pub fn deposit_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    system_program::transfer(
        CpiContext::new(
            system_program.clone(),
            system_program::Transfer {
                from: from.clone(),
                to: to.clone(),
            },
        ),
        amount,
    )
}

/// Pay every lamport above the vault's rent-exempt reserve to `recipient`.
///
/// The vault is program-owned, so lamports are debited directly and no
/// other program runs during the payout. Returns the lamports paid.
#[inline(never)]
pub fn release_excess_lamports<'info>(
    vault: &AccountInfo<'info>,
    recipient: &AccountInfo<'info>,
    rent: &Rent,
) -> Result<u64> {
    let reserve = rent.minimum_balance(vault.data_len());
    let amount = vault.lamports().saturating_sub(reserve);
    if amount == 0 {
        return Ok(0);
    }

    let vault_after = vault.lamports().checked_sub(amount).ok_or(ErrorCode::TransferFailure)?;
    let recipient_after = recipient.lamports().checked_add(amount).ok_or(ErrorCode::TransferFailure)?;

    **vault
        .try_borrow_mut_lamports()
        .map_err(|_| error!(ErrorCode::TransferFailure))? = vault_after;
    **recipient
        .try_borrow_mut_lamports()
        .map_err(|_| error!(ErrorCode::TransferFailure))? = recipient_after;

    #[cfg(feature = "verbose")]
    msg!("Released {} lamports, {} kept as rent reserve", amount, reserve);

    Ok(amount)
}
