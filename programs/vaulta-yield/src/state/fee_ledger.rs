// =============================================================================
// Fee Ledger
// =============================================================================
// Books the withdrawal fees carved out of redemptions. Only one caller (the
// vault account) may book fees; only the owner may sweep them.
//
// The tokens themselves never leave vault custody until `withdraw_fees` -
// this ledger only says how much of the custody balance is protocol revenue.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::FeeError;

/// Protocol fee accounting for one vault.
///
/// PDA derived from ["fee_ledger", vault_pubkey].
#[account]
#[derive(InitSpace, Default)]
pub struct FeeLedger {
    /// The vault this ledger belongs to
    pub vault: Pubkey,

    /// May sweep fees and reconfigure the authorized caller
    pub owner: Pubkey,

    /// The single address allowed to book fees (the vault account)
    pub authorized_caller: Option<Pubkey>,

    /// Fees booked since the last sweep
    pub accumulated: u128,

    /// Fees booked since creation - never decreases
    pub lifetime_total: u128,

    /// Number of fee bookings (analytics)
    pub collections: u64,

    pub bump: u8,
}

impl FeeLedger {
    pub fn initialize(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        self.vault = vault;
        self.owner = owner;
        self.authorized_caller = Some(vault);
        self.accumulated = 0;
        self.lifetime_total = 0;
        self.collections = 0;
        self.bump = bump;
    }

    pub(crate) fn ensure_owner(&self, caller: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.owner, FeeError::NotAuthorized);
        Ok(())
    }

    /// Book a fee. Callable only by `authorized_caller`.
    pub fn collect_fee(&mut self, caller: Pubkey, amount: u128) -> Result<()> {
        require!(
            self.authorized_caller == Some(caller),
            FeeError::NotAuthorized
        );
        require!(amount > 0, FeeError::ZeroAmount);

        let accumulated = self
            .accumulated
            .checked_add(amount)
            .ok_or(FeeError::MathOverflow)?;
        let lifetime_total = self
            .lifetime_total
            .checked_add(amount)
            .ok_or(FeeError::MathOverflow)?;
        let collections = self
            .collections
            .checked_add(1)
            .ok_or(FeeError::MathOverflow)?;

        self.accumulated = accumulated;
        self.lifetime_total = lifetime_total;
        self.collections = collections;

        Ok(())
    }

    /// Sweep everything accumulated. Returns the amount the caller must pay
    /// out to the recipient; `lifetime_total` is untouched.
    pub fn withdraw_fees(&mut self, caller: Pubkey) -> Result<u128> {
        self.ensure_owner(caller)?;
        require!(self.accumulated > 0, FeeError::ZeroAmount);

        let amount = self.accumulated;
        self.accumulated = 0;

        Ok(amount)
    }

    pub fn set_vault_core(&mut self, caller: Pubkey, vault_core: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.authorized_caller = Some(vault_core);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn ledger() -> FeeLedger {
        let mut ledger = FeeLedger::default();
        ledger.initialize(key(1), key(2), 255);
        ledger
    }

    #[test]
    fn starts_empty_and_authorizes_vault() {
        let ledger = ledger();
        assert_eq!(ledger.accumulated, 0);
        assert_eq!(ledger.lifetime_total, 0);
        assert_eq!(ledger.authorized_caller, Some(key(1)));
    }

    #[test]
    fn only_authorized_caller_can_book_fees() {
        let mut ledger = ledger();
        let err = ledger.collect_fee(key(9), 5_000).unwrap_err();
        assert_eq!(err, FeeError::NotAuthorized.into());

        // The owner is not the authorized caller either
        let err = ledger.collect_fee(key(2), 5_000).unwrap_err();
        assert_eq!(err, FeeError::NotAuthorized.into());
        assert_eq!(ledger.accumulated, 0);
    }

    #[test]
    fn rejects_zero_fee() {
        let mut ledger = ledger();
        let err = ledger.collect_fee(key(1), 0).unwrap_err();
        assert_eq!(err, FeeError::ZeroAmount.into());
    }

    #[test]
    fn bookings_accumulate() {
        let mut ledger = ledger();
        ledger.collect_fee(key(1), 1_000).unwrap();
        ledger.collect_fee(key(1), 2_000).unwrap();
        ledger.collect_fee(key(1), 3_000).unwrap();

        assert_eq!(ledger.accumulated, 6_000);
        assert_eq!(ledger.lifetime_total, 6_000);
        assert_eq!(ledger.collections, 3);
    }

    #[test]
    fn sweep_resets_accumulated_but_not_lifetime() {
        let mut ledger = ledger();
        ledger.collect_fee(key(1), 5_000).unwrap();

        assert_eq!(ledger.withdraw_fees(key(2)).unwrap(), 5_000);
        assert_eq!(ledger.accumulated, 0);
        assert_eq!(ledger.lifetime_total, 5_000);

        ledger.collect_fee(key(1), 2_500).unwrap();
        assert_eq!(ledger.accumulated, 2_500);
        assert_eq!(ledger.lifetime_total, 7_500);
    }

    #[test]
    fn sweep_requires_owner_and_balance() {
        let mut ledger = ledger();
        let err = ledger.withdraw_fees(key(2)).unwrap_err();
        assert_eq!(err, FeeError::ZeroAmount.into());

        ledger.collect_fee(key(1), 5_000).unwrap();
        let err = ledger.withdraw_fees(key(3)).unwrap_err();
        assert_eq!(err, FeeError::NotAuthorized.into());
        assert_eq!(ledger.accumulated, 5_000);
    }

    #[test]
    fn owner_rotates_authorized_caller() {
        let mut ledger = ledger();
        let err = ledger.set_vault_core(key(3), key(4)).unwrap_err();
        assert_eq!(err, FeeError::NotAuthorized.into());

        assert!(ledger.set_vault_core(key(2), key(4)).unwrap());
        assert!(ledger.collect_fee(key(1), 100).is_err());
        ledger.collect_fee(key(4), 100).unwrap();
        assert_eq!(ledger.accumulated, 100);
    }
}
