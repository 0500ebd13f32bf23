use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::VAULT_SEED;
use crate::error::VaultError;

/// Narrow a ledger amount to the token program's `u64`.
pub fn to_token_amount(amount: u128) -> Result<u64> {
    u64::try_from(amount).map_err(|_| error!(VaultError::MathOverflow))
}

/// Move `amount` out of custody. The vault PDA is the custody authority, so
/// the transfer is signed with the vault seeds.
pub fn pay_from_custody<'info>(
    token_program: AccountInfo<'info>,
    custody: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    base_mint: Pubkey,
    vault_bump: u8,
    amount: u64,
) -> Result<()> {
    let vault_seeds = &[VAULT_SEED, base_mint.as_ref(), &[vault_bump]];
    let signer_seeds = &[&vault_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program,
        Transfer {
            from: custody,
            to: destination,
            authority: vault,
        },
        signer_seeds,
    );

    token::transfer(transfer_ctx, amount)
}

/// Move `amount` from a signer-owned token account into custody.
pub fn pay_into_custody<'info>(
    token_program: AccountInfo<'info>,
    source: AccountInfo<'info>,
    custody: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let transfer_ctx = CpiContext::new(
        token_program,
        Transfer {
            from: source,
            to: custody,
            authority,
        },
    );

    token::transfer(transfer_ctx, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_amount_fits_u64() {
        assert_eq!(to_token_amount(995_000).unwrap(), 995_000);
        assert_eq!(to_token_amount(u128::from(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn token_amount_rejects_overflow() {
        let err = to_token_amount(u128::from(u64::MAX) + 1).unwrap_err();
        assert_eq!(err, VaultError::MathOverflow.into());
    }
}
