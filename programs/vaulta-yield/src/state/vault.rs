// =============================================================================
// Vault State Account
// =============================================================================
// The share ledger: pooled base asset on one side, claim-token supply on the
// other.
//
//   share price = total_pooled_assets / total_claim_supply   (1.0 when empty)
//   deposit     : minted = amount * supply / assets           (floor)
//   withdraw    : gross  = shares * assets / supply           (floor)
//                 fee    = gross * withdrawal_fee_bps / 10000 (floor)
//                 net    = gross - fee
//
// Floor division always rounds in the vault's favor, so a claim token is
// never worth less after another user's deposit or withdrawal. The withdrawal
// fee is carved out of the leaver's proceeds and booked in the FeeLedger; it
// is not socialized, so it does not move the share price either.
//
// Invariant: total_claim_supply == 0 => total_pooled_assets == 0
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{CompoundLedger, DelegationState, FeeLedger, HarvestLedger, Position};

/// PDA derived from ["vault", base_mint_pubkey]. One vault per base asset.
#[account]
#[derive(InitSpace, Default)]
pub struct Vault {
    // =========================================================================
    // Authority & Linked Accounts
    // =========================================================================

    /// Tunes fees, pauses, sweeps fees, credits compounded proceeds
    pub owner: Pubkey,

    /// The base asset mint users deposit
    pub base_mint: Pubkey,

    /// PDA token account holding pooled assets and uncollected fees
    pub custody: Pubkey,

    pub fee_ledger: Pubkey,
    pub delegation: Pubkey,
    pub harvest_ledger: Pubkey,
    pub compound_ledger: Pubkey,

    // =========================================================================
    // Share Ledger
    // =========================================================================

    /// Base asset owned by depositors (excludes booked fees)
    pub total_pooled_assets: u128,

    /// Outstanding claim tokens
    pub total_claim_supply: u128,

    /// Compounded proceeds credited into `total_pooled_assets` (cumulative)
    pub total_compounded_credited: u128,

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Fee on gross redemption value, 0..=200 bps
    pub withdrawal_fee_bps: u32,

    pub paused: bool,

    /// Off-chain metadata for the claim token, unset until the owner picks one
    #[max_len(256)]
    pub token_uri: Option<String>,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub custody_bump: u8,
}

/// Breakdown of a redemption.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawalQuote {
    pub gross: u128,
    pub fee: u128,
    pub net: u128,
}

/// The ledgers whose owner follows the vault's owner.
pub struct OwnedLedgers<'a> {
    pub fee_ledger: &'a mut FeeLedger,
    pub delegation: &'a mut DelegationState,
    pub harvest_ledger: &'a mut HarvestLedger,
    pub compound_ledger: &'a mut CompoundLedger,
}

/// Linked account addresses fixed at initialization.
pub struct VaultLinks {
    pub base_mint: Pubkey,
    pub custody: Pubkey,
    pub fee_ledger: Pubkey,
    pub delegation: Pubkey,
    pub harvest_ledger: Pubkey,
    pub compound_ledger: Pubkey,
}

impl Vault {
    pub fn initialize(&mut self, owner: Pubkey, links: VaultLinks, bump: u8, custody_bump: u8) {
        self.owner = owner;
        self.base_mint = links.base_mint;
        self.custody = links.custody;
        self.fee_ledger = links.fee_ledger;
        self.delegation = links.delegation;
        self.harvest_ledger = links.harvest_ledger;
        self.compound_ledger = links.compound_ledger;
        self.total_pooled_assets = 0;
        self.total_claim_supply = 0;
        self.total_compounded_credited = 0;
        self.withdrawal_fee_bps = DEFAULT_WITHDRAWAL_FEE_BPS;
        self.paused = false;
        self.token_uri = None;
        self.bump = bump;
        self.custody_bump = custody_bump;
    }

    fn ensure_owner(&self, caller: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.owner, VaultError::NotAuthorized);
        Ok(())
    }

    // =========================================================================
    // Share Math
    // =========================================================================

    /// Share price scaled by PRICE_PRECISION (1.0 => 1_000_000).
    pub fn share_price(&self) -> Result<u128> {
        if self.total_claim_supply == 0 {
            return Ok(PRICE_PRECISION);
        }

        let price = self
            .total_pooled_assets
            .checked_mul(PRICE_PRECISION)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(self.total_claim_supply)
            .ok_or(VaultError::DivisionByZero)?;

        Ok(price)
    }

    /// Claim tokens minted for a deposit of `amount`.
    ///
    /// - Empty vault: 1:1
    /// - Otherwise: amount * supply / assets, rounded down
    pub fn claims_for_deposit(&self, amount: u128) -> Result<u128> {
        if self.total_claim_supply == 0 {
            return Ok(amount);
        }

        let minted = amount
            .checked_mul(self.total_claim_supply)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(self.total_pooled_assets)
            .ok_or(VaultError::DivisionByZero)?;

        Ok(minted)
    }

    /// Base asset backing `shares` claim tokens, before any fee.
    pub fn redemption_value(&self, shares: u128) -> Result<u128> {
        if self.total_claim_supply == 0 {
            return Ok(0);
        }

        let value = shares
            .checked_mul(self.total_pooled_assets)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(self.total_claim_supply)
            .ok_or(VaultError::DivisionByZero)?;

        Ok(value)
    }

    /// Gross/fee/net split for redeeming `shares` at the current fee rate.
    pub fn preview_withdrawal(&self, shares: u128) -> Result<WithdrawalQuote> {
        let gross = self.redemption_value(shares)?;

        let fee = gross
            .checked_mul(u128::from(self.withdrawal_fee_bps))
            .ok_or(VaultError::MathOverflow)?
            .checked_div(BPS_DENOMINATOR)
            .ok_or(VaultError::DivisionByZero)?;

        let net = gross.checked_sub(fee).ok_or(VaultError::MathUnderflow)?;

        Ok(WithdrawalQuote { gross, fee, net })
    }

    /// Current base-asset value of a position (no fee applied).
    pub fn position_value(&self, position: &Position) -> Result<u128> {
        self.redemption_value(position.claim_balance)
    }

    // =========================================================================
    // Deposit / Withdraw
    // =========================================================================

    /// Mint claim tokens for `amount` of base asset. The caller moves the
    /// tokens into custody.
    pub fn deposit(
        &mut self,
        position: &mut Position,
        caller: Pubkey,
        amount: u128,
        current_height: u64,
    ) -> Result<u128> {
        require!(!self.paused, VaultError::Paused);
        require!(amount > 0, VaultError::ZeroAmount);
        require_keys_eq!(position.owner, caller, VaultError::NotAuthorized);

        let minted = self.claims_for_deposit(amount)?;
        require!(minted > 0, VaultError::ZeroSharesMinted);

        let total_pooled_assets = self
            .total_pooled_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_claim_supply = self
            .total_claim_supply
            .checked_add(minted)
            .ok_or(VaultError::MathOverflow)?;

        position.credit_claims(minted)?;
        position.record_deposit(amount, current_height)?;

        self.total_pooled_assets = total_pooled_assets;
        self.total_claim_supply = total_claim_supply;

        Ok(minted)
    }

    /// Burn `shares` claim tokens and book the withdrawal fee. The caller
    /// pays `net` out of custody.
    ///
    /// The fee ledger is called before any vault state is written, so a
    /// rejected fee booking leaves the vault untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw(
        &mut self,
        position: &mut Position,
        fee_ledger: &mut FeeLedger,
        delegation: &DelegationState,
        vault_key: Pubkey,
        caller: Pubkey,
        shares: u128,
        current_height: u64,
    ) -> Result<WithdrawalQuote> {
        require!(!self.paused, VaultError::Paused);
        require!(shares > 0, VaultError::ZeroAmount);
        require_keys_eq!(position.owner, caller, VaultError::NotAuthorized);
        require!(
            shares <= position.claim_balance,
            VaultError::InsufficientBalance
        );
        require!(delegation.is_unlocked(), VaultError::AssetsLocked);

        let quote = self.preview_withdrawal(shares)?;

        let total_pooled_assets = self
            .total_pooled_assets
            .checked_sub(quote.gross)
            .ok_or(VaultError::MathUnderflow)?;
        let total_claim_supply = self
            .total_claim_supply
            .checked_sub(shares)
            .ok_or(VaultError::MathUnderflow)?;

        if quote.fee > 0 {
            fee_ledger.collect_fee(vault_key, quote.fee)?;
        }

        position.debit_claims(shares)?;
        position.record_withdrawal(quote.net, current_height)?;

        self.total_pooled_assets = total_pooled_assets;
        self.total_claim_supply = total_claim_supply;

        Ok(quote)
    }

    /// Move claim tokens between two positions of this vault.
    pub fn transfer_claims(
        &self,
        from: &mut Position,
        to: &mut Position,
        caller: Pubkey,
        shares: u128,
    ) -> Result<()> {
        require!(!self.paused, VaultError::Paused);
        require!(shares > 0, VaultError::ZeroAmount);
        require_keys_eq!(from.owner, caller, VaultError::NotAuthorized);
        require!(shares <= from.claim_balance, VaultError::InsufficientBalance);

        let receiver_balance = to
            .claim_balance
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;

        from.debit_claims(shares)?;
        to.claim_balance = receiver_balance;

        Ok(())
    }

    // =========================================================================
    // Compounding
    // =========================================================================

    /// Credit compounded net proceeds into the pool, raising the share price.
    /// Only possible while claim tokens are outstanding.
    pub fn credit_compounded(
        &mut self,
        compound_ledger: &mut CompoundLedger,
        caller: Pubkey,
        amount: u128,
    ) -> Result<u128> {
        self.ensure_owner(caller)?;
        require!(amount > 0, VaultError::ZeroAmount);
        require!(self.total_claim_supply > 0, VaultError::NoShareholders);

        let total_pooled_assets = self
            .total_pooled_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_compounded_credited = self
            .total_compounded_credited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        compound_ledger.release_to_vault(caller, amount)?;

        self.total_pooled_assets = total_pooled_assets;
        self.total_compounded_credited = total_compounded_credited;

        self.share_price()
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub fn set_withdrawal_fee(&mut self, caller: Pubkey, bps: u32) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(bps <= MAX_WITHDRAWAL_FEE_BPS, VaultError::InvalidFeeRate);
        self.withdrawal_fee_bps = bps;
        Ok(true)
    }

    /// Sweep booked fees out of the fee ledger. Returns the amount to pay the
    /// recipient from custody.
    pub fn collect_fees(&self, fee_ledger: &mut FeeLedger, caller: Pubkey) -> Result<u128> {
        self.ensure_owner(caller)?;
        fee_ledger.withdraw_fees(caller)
    }

    pub fn pause(&mut self, caller: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.paused = true;
        Ok(true)
    }

    pub fn unpause(&mut self, caller: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.paused = false;
        Ok(true)
    }

    pub fn set_token_uri(&mut self, caller: Pubkey, uri: Option<String>) -> Result<bool> {
        self.ensure_owner(caller)?;
        if let Some(uri) = &uri {
            require!(uri.len() <= MAX_TOKEN_URI_LEN, VaultError::TokenUriTooLong);
        }
        self.token_uri = uri;
        Ok(true)
    }

    /// Hand the vault and all four ledgers to `new_owner` at once. Every
    /// ledger must still be owned by `caller`, otherwise nothing moves.
    pub fn transfer_ownership(
        &mut self,
        ledgers: OwnedLedgers<'_>,
        caller: Pubkey,
        new_owner: Pubkey,
    ) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(
            new_owner != Pubkey::default() && new_owner != self.owner,
            VaultError::InvalidOwner
        );
        ledgers.fee_ledger.ensure_owner(caller)?;
        ledgers.delegation.ensure_owner(caller)?;
        ledgers.harvest_ledger.ensure_owner(caller)?;
        ledgers.compound_ledger.ensure_owner(caller)?;

        self.owner = new_owner;
        ledgers.fee_ledger.owner = new_owner;
        ledgers.delegation.owner = new_owner;
        ledgers.harvest_ledger.owner = new_owner;
        ledgers.compound_ledger.owner = new_owner;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompoundError, FeeError};

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn owner() -> Pubkey {
        key(1)
    }

    fn vault_key() -> Pubkey {
        key(100)
    }

    struct Harness {
        vault: Vault,
        fee_ledger: FeeLedger,
        delegation: DelegationState,
        harvest_ledger: HarvestLedger,
        compound_ledger: CompoundLedger,
    }

    impl Harness {
        fn new() -> Self {
            let mut vault = Vault::default();
            vault.initialize(
                owner(),
                VaultLinks {
                    base_mint: key(101),
                    custody: key(102),
                    fee_ledger: key(103),
                    delegation: key(104),
                    harvest_ledger: key(105),
                    compound_ledger: key(106),
                },
                255,
                254,
            );

            let mut fee_ledger = FeeLedger::default();
            fee_ledger.initialize(vault_key(), owner(), 253);

            let mut delegation = DelegationState::default();
            delegation.initialize(vault_key(), owner(), 252);

            let mut harvest_ledger = HarvestLedger::default();
            harvest_ledger.initialize(vault_key(), owner(), 249);

            let mut compound_ledger = CompoundLedger::default();
            compound_ledger.initialize(vault_key(), owner(), 251);

            Self {
                vault,
                fee_ledger,
                delegation,
                harvest_ledger,
                compound_ledger,
            }
        }

        fn hand_over(&mut self, caller: Pubkey, new_owner: Pubkey) -> Result<bool> {
            self.vault.transfer_ownership(
                OwnedLedgers {
                    fee_ledger: &mut self.fee_ledger,
                    delegation: &mut self.delegation,
                    harvest_ledger: &mut self.harvest_ledger,
                    compound_ledger: &mut self.compound_ledger,
                },
                caller,
                new_owner,
            )
        }

        fn position(&self, user: Pubkey) -> Position {
            let mut position = Position::default();
            position.bind(vault_key(), user, 250);
            position
        }

        fn withdraw(&mut self, position: &mut Position, shares: u128) -> Result<WithdrawalQuote> {
            let caller = position.owner;
            self.vault.withdraw(
                position,
                &mut self.fee_ledger,
                &self.delegation,
                vault_key(),
                caller,
                shares,
                10,
            )
        }
    }

    #[test]
    fn first_deposit_mints_one_to_one() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));

        assert_eq!(h.vault.share_price().unwrap(), PRICE_PRECISION);
        let minted = h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        assert_eq!(minted, 1_000_000);
        assert_eq!(alice.claim_balance, 1_000_000);
        assert_eq!(h.vault.share_price().unwrap(), PRICE_PRECISION);
        assert_eq!(h.vault.position_value(&alice).unwrap(), 1_000_000);
    }

    #[test]
    fn later_deposits_mint_proportionally() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let minted = h.vault.deposit(&mut alice, key(2), 500_000, 2).unwrap();
        assert_eq!(minted, 500_000);
        assert_eq!(alice.claim_balance, 1_500_000);
        assert_eq!(alice.deposit_count, 2);
        assert_eq!(h.vault.total_pooled_assets, 1_500_000);
        assert_eq!(h.vault.total_claim_supply, 1_500_000);
    }

    #[test]
    fn mint_rounds_down_against_depositor() {
        let mut h = Harness::new();
        h.vault.total_pooled_assets = 3_000_000;
        h.vault.total_claim_supply = 2_000_000;

        // 1_000_001 * 2 / 3 = 666_667.33 -> 666_667
        assert_eq!(h.vault.claims_for_deposit(1_000_001).unwrap(), 666_667);
    }

    #[test]
    fn dust_deposit_that_mints_nothing_is_rejected() {
        let mut h = Harness::new();
        h.vault.total_pooled_assets = 10_000_000;
        h.vault.total_claim_supply = 1_000_000;
        let mut bob = h.position(key(3));

        let err = h.vault.deposit(&mut bob, key(3), 9, 1).unwrap_err();
        assert_eq!(err, VaultError::ZeroSharesMinted.into());
        assert_eq!(h.vault.total_pooled_assets, 10_000_000);
    }

    #[test]
    fn deposit_rejects_zero_and_foreign_position() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));

        let err = h.vault.deposit(&mut alice, key(2), 0, 1).unwrap_err();
        assert_eq!(err, VaultError::ZeroAmount.into());

        let err = h.vault.deposit(&mut alice, key(3), 10, 1).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());
    }

    #[test]
    fn full_withdrawal_pays_net_and_books_fee() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let quote = h.withdraw(&mut alice, 1_000_000).unwrap();

        assert_eq!(
            quote,
            WithdrawalQuote {
                gross: 1_000_000,
                fee: 5_000,
                net: 995_000,
            }
        );
        assert_eq!(h.fee_ledger.accumulated, 5_000);
        assert_eq!(h.vault.total_pooled_assets, 0);
        assert_eq!(h.vault.total_claim_supply, 0);
        assert_eq!(alice.claim_balance, 0);
        assert_eq!(alice.total_withdrawn, 995_000);
    }

    #[test]
    fn partial_withdrawal() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let quote = h.withdraw(&mut alice, 500_000).unwrap();
        assert_eq!(quote.net, 497_500);
        assert_eq!(alice.claim_balance, 500_000);
        assert_eq!(h.vault.share_price().unwrap(), PRICE_PRECISION);
    }

    #[test]
    fn withdrawal_guards() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let err = h.withdraw(&mut alice, 0).unwrap_err();
        assert_eq!(err, VaultError::ZeroAmount.into());

        let err = h.withdraw(&mut alice, 2_000_000).unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());
        assert_eq!(alice.claim_balance, 1_000_000);
    }

    #[test]
    fn zero_fee_rate_skips_fee_ledger() {
        let mut h = Harness::new();
        h.vault.set_withdrawal_fee(owner(), 0).unwrap();
        // Fee ledger no longer trusts the vault; a zero fee never reaches it
        h.fee_ledger.set_vault_core(owner(), key(77)).unwrap();

        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();
        let quote = h.withdraw(&mut alice, 1_000_000).unwrap();

        assert_eq!(quote.net, 1_000_000);
        assert_eq!(h.fee_ledger.accumulated, 0);
    }

    #[test]
    fn rejected_fee_booking_leaves_vault_untouched() {
        let mut h = Harness::new();
        h.fee_ledger.set_vault_core(owner(), key(77)).unwrap();

        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let err = h.withdraw(&mut alice, 1_000_000).unwrap_err();
        assert_eq!(err, FeeError::NotAuthorized.into());
        assert_eq!(alice.claim_balance, 1_000_000);
        assert_eq!(h.vault.total_pooled_assets, 1_000_000);
        assert_eq!(h.vault.total_claim_supply, 1_000_000);
    }

    #[test]
    fn withdrawals_wait_for_delegation_unlock() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();
        h.delegation.is_locked = true;

        let err = h.withdraw(&mut alice, 1_000_000).unwrap_err();
        assert_eq!(err, VaultError::AssetsLocked.into());

        h.delegation.is_locked = false;
        assert!(h.withdraw(&mut alice, 1_000_000).is_ok());
    }

    #[test]
    fn fee_rate_is_capped_and_owner_only() {
        let mut h = Harness::new();
        let err = h.vault.set_withdrawal_fee(owner(), 201).unwrap_err();
        assert_eq!(err, VaultError::InvalidFeeRate.into());

        let err = h.vault.set_withdrawal_fee(key(2), 100).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());

        assert!(h.vault.set_withdrawal_fee(owner(), 200).unwrap());
        assert_eq!(h.vault.withdrawal_fee_bps, 200);
    }

    #[test]
    fn pause_blocks_deposit_and_withdraw() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let err = h.vault.pause(key(2)).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());
        h.vault.pause(owner()).unwrap();

        let err = h.vault.deposit(&mut alice, key(2), 1_000_000, 2).unwrap_err();
        assert_eq!(err, VaultError::Paused.into());
        let err = h.withdraw(&mut alice, 1_000_000).unwrap_err();
        assert_eq!(err, VaultError::Paused.into());

        h.vault.unpause(owner()).unwrap();
        assert_eq!(h.withdraw(&mut alice, 1_000_000).unwrap().net, 995_000);
    }

    #[test]
    fn collect_fees_round_trip() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();
        h.withdraw(&mut alice, 1_000_000).unwrap();

        let err = h.vault.collect_fees(&mut h.fee_ledger, key(2)).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());

        assert_eq!(h.vault.collect_fees(&mut h.fee_ledger, owner()).unwrap(), 5_000);
        assert_eq!(h.fee_ledger.accumulated, 0);
        assert_eq!(h.fee_ledger.lifetime_total, 5_000);

        let err = h.vault.collect_fees(&mut h.fee_ledger, owner()).unwrap_err();
        assert_eq!(err, FeeError::ZeroAmount.into());
    }

    #[test]
    fn claim_transfers_conserve_supply() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        let mut bob = h.position(key(3));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();

        let err = h
            .vault
            .transfer_claims(&mut alice, &mut bob, key(3), 10)
            .unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());

        h.vault
            .transfer_claims(&mut alice, &mut bob, key(2), 400_000)
            .unwrap();
        assert_eq!(alice.claim_balance, 600_000);
        assert_eq!(bob.claim_balance, 400_000);
        assert_eq!(
            alice.claim_balance + bob.claim_balance,
            h.vault.total_claim_supply
        );

        let err = h
            .vault
            .transfer_claims(&mut alice, &mut bob, key(2), 600_001)
            .unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());
    }

    #[test]
    fn crediting_compounded_proceeds_raises_share_price() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));

        let mut record = crate::state::CompoundRecord::default();
        h.compound_ledger
            .execute_compound_mock(&mut record, owner(), 100_000_000, 5)
            .unwrap();

        let err = h
            .vault
            .credit_compounded(&mut h.compound_ledger, owner(), 49_000)
            .unwrap_err();
        assert_eq!(err, VaultError::NoShareholders.into());

        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();
        let price = h
            .vault
            .credit_compounded(&mut h.compound_ledger, owner(), 49_000)
            .unwrap();

        assert_eq!(price, 1_049_000);
        assert_eq!(h.vault.total_pooled_assets, 1_049_000);
        assert_eq!(h.vault.position_value(&alice).unwrap(), 1_049_000);
        assert_eq!(h.compound_ledger.uncredited(), 0);

        // A new depositor buys in at the higher price
        let mut bob = h.position(key(3));
        assert_eq!(h.vault.deposit(&mut bob, key(3), 1_049_000, 2).unwrap(), 1_000_000);
    }

    #[test]
    fn ownership_transfer() {
        let mut h = Harness::new();
        let err = h.hand_over(owner(), owner()).unwrap_err();
        assert_eq!(err, VaultError::InvalidOwner.into());

        let err = h.hand_over(key(2), key(9)).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());

        h.hand_over(owner(), key(9)).unwrap();
        assert!(h.vault.pause(owner()).is_err());
        assert!(h.vault.pause(key(9)).unwrap());

        assert_eq!(h.fee_ledger.owner, key(9));
        assert_eq!(h.delegation.owner, key(9));
        assert_eq!(h.harvest_ledger.owner, key(9));
        assert_eq!(h.compound_ledger.owner, key(9));
    }

    #[test]
    fn new_owner_sweeps_fees_and_credits_proceeds() {
        let mut h = Harness::new();
        let mut alice = h.position(key(2));
        h.vault.deposit(&mut alice, key(2), 1_000_000, 1).unwrap();
        h.withdraw(&mut alice, 500_000).unwrap();

        let mut record = crate::state::CompoundRecord::default();
        h.compound_ledger
            .execute_compound_mock(&mut record, owner(), 100_000_000, 5)
            .unwrap();

        h.hand_over(owner(), key(9)).unwrap();

        let err = h.vault.collect_fees(&mut h.fee_ledger, owner()).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());
        assert_eq!(h.vault.collect_fees(&mut h.fee_ledger, key(9)).unwrap(), 2_500);

        let err = h
            .vault
            .credit_compounded(&mut h.compound_ledger, owner(), 49_000)
            .unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());
        assert_eq!(
            h.vault
                .credit_compounded(&mut h.compound_ledger, key(9), 49_000)
                .unwrap(),
            1_098_000
        );
    }

    #[test]
    fn ownership_transfer_is_all_or_nothing() {
        let mut h = Harness::new();
        h.compound_ledger.owner = key(7);

        let err = h.hand_over(owner(), key(9)).unwrap_err();
        assert_eq!(err, CompoundError::NotAuthorized.into());
        assert_eq!(h.vault.owner, owner());
        assert_eq!(h.fee_ledger.owner, owner());
        assert_eq!(h.delegation.owner, owner());
        assert_eq!(h.harvest_ledger.owner, owner());
    }

    #[test]
    fn token_uri_starts_unset_and_is_owner_only() {
        let mut h = Harness::new();
        assert_eq!(h.vault.token_uri, None);

        let uri = "https://vaultayield.io/token-metadata.json".to_string();
        let err = h.vault.set_token_uri(key(2), Some(uri.clone())).unwrap_err();
        assert_eq!(err, VaultError::NotAuthorized.into());
        assert_eq!(h.vault.token_uri, None);

        assert!(h.vault.set_token_uri(owner(), Some(uri.clone())).unwrap());
        assert_eq!(h.vault.token_uri, Some(uri));

        let err = h
            .vault
            .set_token_uri(owner(), Some("x".repeat(MAX_TOKEN_URI_LEN + 1)))
            .unwrap_err();
        assert_eq!(err, VaultError::TokenUriTooLong.into());

        assert!(h.vault.set_token_uri(owner(), None).unwrap());
        assert_eq!(h.vault.token_uri, None);
    }

    #[test]
    fn conservation_over_mixed_sequence() {
        let mut h = Harness::new();
        let mut positions: Vec<Position> = (2..6).map(|n| h.position(key(n))).collect();

        let script: [(usize, bool, u128); 10] = [
            (0, true, 1_000_000),
            (1, true, 2_345_678),
            (2, true, 777),
            (0, false, 333_333),
            (3, true, 10_000_001),
            (1, false, 2_345_678),
            (2, true, 5_000_000),
            (3, false, 9_999_999),
            (0, false, 666_667),
            (2, false, 1_000),
        ];

        for (idx, is_deposit, amount) in script {
            let position = &mut positions[idx];
            let caller = position.owner;
            if is_deposit {
                h.vault.deposit(position, caller, amount, 1).unwrap();
            } else {
                h.withdraw(position, amount).unwrap();
            }

            let sum: u128 = positions.iter().map(|p| p.claim_balance).sum();
            assert_eq!(sum, h.vault.total_claim_supply);
            assert!(h.vault.share_price().unwrap() >= PRICE_PRECISION);
        }
    }
}
