// =============================================================================
// Compound Ledger
// =============================================================================
// Converts harvested rewards into the base asset and keeps the conversion
// history.
//
// Conversion (all integer, floor division):
//   gross = amount * mock_rate / REWARD_UNIT_SCALE
//   fee   = gross * performance_fee_bps / 10000
//   net   = gross - fee
//
// Swaps are simulated at `mock_rate`; the real-exchange path is a placeholder
// that always fails until an exchange integration exists. Net proceeds are
// later released to the vault (`release_to_vault`) where they raise the
// share price.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::CompoundError;

#[account]
#[derive(InitSpace, Default)]
pub struct CompoundLedger {
    pub vault: Pubkey,
    pub owner: Pubkey,

    /// Net base asset produced by all conversions
    pub total_compounded: u128,

    /// Portion of `total_compounded` already credited to the vault
    pub total_credited: u128,

    /// Number of conversions (also the index of the latest history record)
    pub total_compounds: u64,

    /// Base units received per 1.0 reward unit in mock mode
    pub mock_rate: u128,

    pub slippage_bps: u32,
    pub performance_fee_bps: u32,

    /// Exchange used by the real conversion path
    pub dex_ref: Option<Pubkey>,
    pub mock_mode: bool,

    pub harvest_manager: Option<Pubkey>,
    pub vault_core: Option<Pubkey>,

    pub bump: u8,
}

/// One conversion, indexed from 1.
///
/// PDA derived from ["compound_record", compound_ledger_pubkey, index].
#[account]
#[derive(InitSpace, Default)]
pub struct CompoundRecord {
    pub compound_ledger: Pubkey,
    pub index: u64,
    /// Reward asset converted
    pub btc_amount: u128,
    /// Gross base asset received
    pub stx_received: u128,
    /// Performance fee taken from `stx_received`
    pub fee_amount: u128,
    pub height: u64,
    pub bump: u8,
}

/// Result of a (simulated) conversion.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompoundImpact {
    pub gross: u128,
    pub fee: u128,
    pub net: u128,
}

impl CompoundLedger {
    pub fn initialize(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        self.vault = vault;
        self.owner = owner;
        self.total_compounded = 0;
        self.total_credited = 0;
        self.total_compounds = 0;
        self.mock_rate = DEFAULT_MOCK_RATE;
        self.slippage_bps = DEFAULT_SLIPPAGE_BPS;
        self.performance_fee_bps = PERFORMANCE_FEE_BPS;
        self.dex_ref = None;
        self.mock_mode = true;
        self.harvest_manager = None;
        self.vault_core = None;
        self.bump = bump;
    }

    pub(crate) fn ensure_owner(&self, caller: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.owner, CompoundError::NotAuthorized);
        Ok(())
    }

    /// Pure conversion preview at the current rate.
    pub fn calculate_impact(&self, amount: u128) -> Result<CompoundImpact> {
        let gross = amount
            .checked_mul(self.mock_rate)
            .ok_or(CompoundError::MathOverflow)?
            .checked_div(REWARD_UNIT_SCALE)
            .ok_or(CompoundError::DivisionByZero)?;

        let fee = gross
            .checked_mul(u128::from(self.performance_fee_bps))
            .ok_or(CompoundError::MathOverflow)?
            .checked_div(BPS_DENOMINATOR)
            .ok_or(CompoundError::DivisionByZero)?;

        let net = gross.checked_sub(fee).ok_or(CompoundError::MathUnderflow)?;

        Ok(CompoundImpact { gross, fee, net })
    }

    /// Simulated conversion: writes the history `record` and bumps totals.
    pub fn execute_compound_mock(
        &mut self,
        record: &mut CompoundRecord,
        caller: Pubkey,
        amount: u128,
        current_height: u64,
    ) -> Result<CompoundImpact> {
        self.ensure_owner(caller)?;
        require!(amount > 0, CompoundError::ZeroAmount);

        let impact = self.calculate_impact(amount)?;

        let index = self.next_record_index()?;
        let total_compounded = self
            .total_compounded
            .checked_add(impact.net)
            .ok_or(CompoundError::MathOverflow)?;

        record.index = index;
        record.btc_amount = amount;
        record.stx_received = impact.gross;
        record.fee_amount = impact.fee;
        record.height = current_height;

        self.total_compounds = index;
        self.total_compounded = total_compounded;

        Ok(impact)
    }

    /// Real-exchange conversion. No exchange is integrated yet, so this only
    /// reports why it cannot run.
    pub fn execute_compound(&self, caller: Pubkey, amount: u128) -> Result<CompoundImpact> {
        self.ensure_owner(caller)?;
        require!(amount > 0, CompoundError::ZeroAmount);
        require!(
            !self.mock_mode && self.dex_ref.is_some(),
            CompoundError::DexNotSet
        );

        // No exchange adapter is integrated, so a configured exchange still
        // cannot be used.
        err!(CompoundError::DexNotSet)
    }

    /// Index the next history record will get.
    pub fn next_record_index(&self) -> Result<u64> {
        self.total_compounds
            .checked_add(1)
            .ok_or_else(|| error!(CompoundError::MathOverflow))
    }

    /// Compounded proceeds not yet credited to the vault.
    pub fn uncredited(&self) -> u128 {
        self.total_compounded.saturating_sub(self.total_credited)
    }

    /// Mark `amount` of compounded proceeds as credited to the vault.
    pub fn release_to_vault(&mut self, caller: Pubkey, amount: u128) -> Result<()> {
        self.ensure_owner(caller)?;
        require!(amount > 0, CompoundError::ZeroAmount);
        require!(amount <= self.uncredited(), CompoundError::ExceedsCompounded);

        self.total_credited = self
            .total_credited
            .checked_add(amount)
            .ok_or(CompoundError::MathOverflow)?;

        Ok(())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_mock_exchange_rate(&mut self, caller: Pubkey, rate: u128) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(rate > 0, CompoundError::ZeroAmount);
        self.mock_rate = rate;
        Ok(true)
    }

    pub fn set_slippage_tolerance(&mut self, caller: Pubkey, bps: u32) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(bps <= MAX_SLIPPAGE_BPS, CompoundError::SlippageExceeded);
        self.slippage_bps = bps;
        Ok(true)
    }

    /// Configuring an exchange switches the ledger out of mock mode.
    pub fn set_dex_contract(&mut self, caller: Pubkey, dex: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.dex_ref = Some(dex);
        self.mock_mode = false;
        Ok(true)
    }

    pub fn enable_mock_dex_mode(&mut self, caller: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.mock_mode = true;
        Ok(true)
    }

    pub fn set_harvest_manager(&mut self, caller: Pubkey, manager: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.harvest_manager = Some(manager);
        Ok(true)
    }

    pub fn set_vault_core(&mut self, caller: Pubkey, vault_core: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.vault_core = Some(vault_core);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_BTC: u128 = 100_000_000;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn owner() -> Pubkey {
        key(1)
    }

    fn ledger() -> CompoundLedger {
        let mut ledger = CompoundLedger::default();
        ledger.initialize(key(9), owner(), 252);
        ledger
    }

    fn compound(
        ledger: &mut CompoundLedger,
        history: &mut Vec<CompoundRecord>,
        amount: u128,
    ) -> Result<CompoundImpact> {
        let mut record = CompoundRecord::default();
        let impact = ledger.execute_compound_mock(&mut record, owner(), amount, 42)?;
        history.push(record);
        Ok(impact)
    }

    #[test]
    fn starts_in_mock_mode_with_defaults() {
        let ledger = ledger();
        assert!(ledger.mock_mode);
        assert_eq!(ledger.dex_ref, None);
        assert_eq!(ledger.slippage_bps, 50);
        assert_eq!(ledger.mock_rate, 50_000);
        assert_eq!(ledger.total_compounded, 0);
        assert_eq!(ledger.total_compounds, 0);
    }

    #[test]
    fn impact_of_one_reward_unit() {
        let impact = ledger().calculate_impact(ONE_BTC).unwrap();
        assert_eq!(
            impact,
            CompoundImpact {
                gross: 50_000,
                fee: 1_000,
                net: 49_000,
            }
        );
    }

    #[test]
    fn impact_scales_and_net_is_gross_minus_fee() {
        let ledger = ledger();
        let half = ledger.calculate_impact(ONE_BTC / 2).unwrap();
        assert_eq!((half.gross, half.fee, half.net), (25_000, 500, 24_500));

        for amount in [0, 1, 1_999, 2_000, 85_000_000, 123_456_789_012, u64::MAX as u128] {
            let impact = ledger.calculate_impact(amount).unwrap();
            assert_eq!(impact.net, impact.gross - impact.fee);
            assert_eq!(impact.fee, impact.gross * 200 / 10_000);
        }
    }

    #[test]
    fn mock_compound_records_history() {
        let mut ledger = ledger();
        let mut history = Vec::new();

        let impact = compound(&mut ledger, &mut history, 2 * ONE_BTC).unwrap();
        assert_eq!(impact.net, 98_000);

        let record = &history[0];
        assert_eq!(record.index, 1);
        assert_eq!(record.btc_amount, 2 * ONE_BTC);
        assert_eq!(record.stx_received, 100_000);
        assert_eq!(record.fee_amount, 2_000);
        assert_eq!(record.height, 42);
    }

    #[test]
    fn multiple_compounds_accumulate() {
        let mut ledger = ledger();
        let mut history = Vec::new();
        compound(&mut ledger, &mut history, ONE_BTC).unwrap();
        compound(&mut ledger, &mut history, ONE_BTC / 2).unwrap();

        assert_eq!(ledger.total_compounds, 2);
        assert_eq!(ledger.total_compounded, 49_000 + 24_500);
        assert_eq!(history[1].index, 2);
    }

    #[test]
    fn mock_compound_guards() {
        let mut ledger = ledger();
        let mut record = CompoundRecord::default();

        let err = ledger
            .execute_compound_mock(&mut record, key(4), ONE_BTC, 0)
            .unwrap_err();
        assert_eq!(err, CompoundError::NotAuthorized.into());

        let err = ledger
            .execute_compound_mock(&mut record, owner(), 0, 0)
            .unwrap_err();
        assert_eq!(err, CompoundError::ZeroAmount.into());

        assert_eq!(ledger.total_compounds, 0);
        assert_eq!(record.index, 0);
    }

    #[test]
    fn custom_rate_applies() {
        let mut ledger = ledger();
        let err = ledger.set_mock_exchange_rate(owner(), 0).unwrap_err();
        assert_eq!(err, CompoundError::ZeroAmount.into());

        ledger.set_mock_exchange_rate(owner(), 60_000).unwrap();
        let impact = ledger.calculate_impact(ONE_BTC).unwrap();
        assert_eq!((impact.gross, impact.fee), (60_000, 1_200));
    }

    #[test]
    fn slippage_is_capped() {
        let mut ledger = ledger();
        let err = ledger.set_slippage_tolerance(owner(), 600).unwrap_err();
        assert_eq!(err, CompoundError::SlippageExceeded.into());

        assert!(ledger.set_slippage_tolerance(owner(), 500).unwrap());
        assert_eq!(ledger.slippage_bps, 500);
    }

    #[test]
    fn real_exchange_path_always_fails() {
        let mut ledger = ledger();
        let err = ledger.execute_compound(owner(), ONE_BTC).unwrap_err();
        assert_eq!(err, CompoundError::DexNotSet.into());

        ledger.set_dex_contract(owner(), key(5)).unwrap();
        assert!(!ledger.mock_mode);
        let err = ledger.execute_compound(owner(), ONE_BTC).unwrap_err();
        assert_eq!(err, CompoundError::DexNotSet.into());

        ledger.enable_mock_dex_mode(owner()).unwrap();
        let err = ledger.execute_compound(owner(), ONE_BTC).unwrap_err();
        assert_eq!(err, CompoundError::DexNotSet.into());
    }

    #[test]
    fn setters_are_owner_only() {
        let mut ledger = ledger();
        let intruder = key(6);
        for result in [
            ledger.set_dex_contract(intruder, key(5)),
            ledger.enable_mock_dex_mode(intruder),
            ledger.set_harvest_manager(intruder, key(5)),
            ledger.set_vault_core(intruder, key(5)),
            ledger.set_mock_exchange_rate(intruder, 1),
            ledger.set_slippage_tolerance(intruder, 1),
        ] {
            assert_eq!(result.unwrap_err(), CompoundError::NotAuthorized.into());
        }

        assert!(ledger.set_harvest_manager(owner(), key(7)).unwrap());
        assert!(ledger.set_vault_core(owner(), key(8)).unwrap());
        assert_eq!(ledger.harvest_manager, Some(key(7)));
        assert_eq!(ledger.vault_core, Some(key(8)));
    }

    #[test]
    fn release_to_vault_is_bounded_by_uncredited() {
        let mut ledger = ledger();
        let mut history = Vec::new();
        compound(&mut ledger, &mut history, ONE_BTC).unwrap();

        let err = ledger.release_to_vault(owner(), 49_001).unwrap_err();
        assert_eq!(err, CompoundError::ExceedsCompounded.into());

        ledger.release_to_vault(owner(), 40_000).unwrap();
        assert_eq!(ledger.uncredited(), 9_000);
        ledger.release_to_vault(owner(), 9_000).unwrap();
        assert_eq!(ledger.uncredited(), 0);
    }
}
