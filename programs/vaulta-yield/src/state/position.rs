// =============================================================================
// Position State Account
// =============================================================================
// A depositor's claim-token balance in one vault, plus running statistics.
// The claim ledger is the set of all Position accounts of a vault: their
// `claim_balance` values always sum to the vault's `total_claim_supply`.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// PDA derived from ["position", vault_pubkey, owner_pubkey].
/// One Position per user per vault.
#[account]
#[derive(InitSpace, Default)]
pub struct Position {
    /// The vault this position belongs to
    pub vault: Pubkey,

    /// The wallet that owns the claim tokens
    pub owner: Pubkey,

    /// Claim tokens currently held
    pub claim_balance: u128,

    /// Base asset deposited (cumulative)
    pub total_deposited: u128,

    /// Net base asset paid out on withdrawals (cumulative)
    pub total_withdrawn: u128,

    pub deposit_count: u32,

    /// Height of the most recent deposit
    pub last_deposit_height: u64,

    /// Height of the most recent withdrawal
    pub last_withdrawal_height: u64,

    pub bump: u8,
}

impl Position {
    /// Bind a freshly created position to its vault and owner.
    /// No-op for a position that is already bound.
    pub fn bind(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.vault = vault;
            self.owner = owner;
            self.bump = bump;
        }
    }

    pub fn credit_claims(&mut self, claims: u128) -> Result<()> {
        self.claim_balance = self
            .claim_balance
            .checked_add(claims)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn debit_claims(&mut self, claims: u128) -> Result<()> {
        self.claim_balance = self
            .claim_balance
            .checked_sub(claims)
            .ok_or(VaultError::InsufficientBalance)?;
        Ok(())
    }

    pub fn record_deposit(&mut self, amount: u128, height: u64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.deposit_count = self
            .deposit_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        self.last_deposit_height = height;

        Ok(())
    }

    pub fn record_withdrawal(&mut self, net_amount: u128, height: u64) -> Result<()> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(net_amount)
            .ok_or(VaultError::MathOverflow)?;

        self.last_withdrawal_height = height;

        Ok(())
    }
}
