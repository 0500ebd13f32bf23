// =============================================================================
// VaultaYield - Auto-Compounding Yield Vault
// =============================================================================
//
// Depositors pool a base asset and receive claim tokens. The vault:
// - Delegates the pooled asset into a time-locked reward cycle
// - Records the reward paid for each completed cycle
// - Converts rewards back into the base asset (performance fee taken)
// - Credits the proceeds to the pool, raising the share price
//
// A small withdrawal fee is booked in a separate fee ledger and swept by the
// owner.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("BrSh7kY4dFvi2tmkdGVSC7G1vYYuoHWGTSWLHeTrcLvq");

#[program]
pub mod vaulta_yield {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create a vault for `base_mint` with its custody account and ledgers
    ///
    /// Creates:
    /// - Vault account (share ledger and configuration)
    /// - Custody token account (owned by the vault PDA)
    /// - Fee ledger, delegation state, harvest ledger, compound ledger
    ///
    /// Can only be called once per base mint
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        instructions::initialize_vault::handler_initialize_vault(ctx)
    }

    // =========================================================================
    // Depositor Operations
    // =========================================================================

    /// Deposit base asset and receive claim tokens
    ///
    /// # Returns
    /// * Claim tokens minted at the current share price
    pub fn deposit(ctx: Context<DepositToVault>, amount: u64) -> Result<u128> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Burn claim tokens and receive their value minus the withdrawal fee
    ///
    /// Fails while the pooled asset is locked in a delegation
    ///
    /// # Returns
    /// * Net amount paid out
    pub fn withdraw(ctx: Context<WithdrawFromVault>, shares: u128) -> Result<u128> {
        instructions::withdraw::handler_withdraw(ctx, shares)
    }

    /// Move claim tokens to another wallet's position in the same vault
    pub fn transfer_claims(ctx: Context<TransferClaims>, shares: u128) -> Result<bool> {
        instructions::transfer_claims::handler_transfer_claims(ctx, shares)
    }

    // =========================================================================
    // Vault Admin (owner only)
    // =========================================================================

    /// Set the withdrawal fee, at most 200 bps
    pub fn set_withdrawal_fee(ctx: Context<VaultAdmin>, bps: u32) -> Result<bool> {
        instructions::admin::handler_set_withdrawal_fee(ctx, bps)
    }

    /// Stop deposits, withdrawals and claim transfers
    pub fn pause_vault(ctx: Context<VaultAdmin>) -> Result<bool> {
        instructions::admin::handler_pause_vault(ctx)
    }

    pub fn unpause_vault(ctx: Context<VaultAdmin>) -> Result<bool> {
        instructions::admin::handler_unpause_vault(ctx)
    }

    /// Point the claim token's metadata at `uri`, or clear it with `None`
    pub fn set_token_uri(ctx: Context<VaultAdmin>, uri: Option<String>) -> Result<bool> {
        instructions::admin::handler_set_token_uri(ctx, uri)
    }

    /// Hand the vault and all of its ledgers to `new_owner`
    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<bool> {
        instructions::admin::handler_transfer_ownership(ctx, new_owner)
    }

    /// Sweep accumulated withdrawal fees from custody to `recipient_token_account`
    pub fn collect_fees(ctx: Context<CollectFees>) -> Result<u128> {
        instructions::admin::handler_collect_fees(ctx)
    }

    /// Change which address may book fees in the fee ledger
    pub fn set_fee_ledger_vault(ctx: Context<ManageFeeLedger>, vault_core: Pubkey) -> Result<bool> {
        instructions::admin::handler_set_fee_ledger_vault(ctx, vault_core)
    }

    /// Credit converted proceeds into the pool
    ///
    /// Bounded by the compound ledger's uncredited net proceeds. Tokens move
    /// from the owner's account into custody.
    ///
    /// # Returns
    /// * Share price after the credit
    pub fn credit_compounded(ctx: Context<CreditCompounded>, amount: u64) -> Result<u128> {
        instructions::admin::handler_credit_compounded(ctx, amount)
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    pub fn set_vault_ref(ctx: Context<ManageDelegation>, vault_ref: Pubkey) -> Result<bool> {
        instructions::manage_delegation::handler_set_vault_ref(ctx, vault_ref)
    }

    /// Fails while a delegation is active
    pub fn update_pool_operator(ctx: Context<ManageDelegation>, operator: Pubkey) -> Result<bool> {
        instructions::manage_delegation::handler_update_pool_operator(ctx, operator)
    }

    /// External reward destination (33-byte compressed key)
    pub fn set_reward_address(
        ctx: Context<ManageDelegation>,
        reward_address: [u8; 33],
    ) -> Result<bool> {
        instructions::manage_delegation::handler_set_reward_address(ctx, reward_address)
    }

    /// Lock `amount` for `cycles` reward cycles (1..=12). Signer must be the
    /// configured vault ref.
    pub fn delegate(ctx: Context<ManageDelegation>, amount: u64, cycles: u64) -> Result<bool> {
        instructions::manage_delegation::handler_delegate(ctx, amount, cycles)
    }

    /// Unlock once the unlock cycle has been reached
    pub fn revoke(ctx: Context<ManageDelegation>) -> Result<bool> {
        instructions::manage_delegation::handler_revoke(ctx)
    }

    // =========================================================================
    // Harvest
    // =========================================================================

    /// Record the reward paid for a completed cycle. Write-once per cycle.
    pub fn record_reward(ctx: Context<RecordReward>, cycle_id: u64, amount: u128) -> Result<u128> {
        instructions::harvest::handler_record_reward(ctx, cycle_id, amount)
    }

    /// Permissionless; at most once per harvest interval
    pub fn harvest_rewards(ctx: Context<HarvestRewards>) -> Result<u128> {
        instructions::harvest::handler_harvest_rewards(ctx)
    }

    pub fn set_harvest_interval(ctx: Context<ManageHarvest>, blocks: u64) -> Result<bool> {
        instructions::harvest::handler_set_harvest_interval(ctx, blocks)
    }

    pub fn set_stacking_strategy(ctx: Context<ManageHarvest>, strategy: Pubkey) -> Result<bool> {
        instructions::harvest::handler_set_stacking_strategy(ctx, strategy)
    }

    pub fn set_compound_engine(ctx: Context<ManageHarvest>, engine: Pubkey) -> Result<bool> {
        instructions::harvest::handler_set_compound_engine(ctx, engine)
    }

    // =========================================================================
    // Compound
    // =========================================================================

    /// Simulated conversion at the mock rate; appends a history record
    pub fn execute_compound_mock(
        ctx: Context<ExecuteCompoundMock>,
        amount: u128,
    ) -> Result<CompoundImpact> {
        instructions::compound::handler_execute_compound_mock(ctx, amount)
    }

    /// Real-exchange conversion (not available yet)
    pub fn execute_compound(ctx: Context<ManageCompound>, amount: u128) -> Result<CompoundImpact> {
        instructions::compound::handler_execute_compound(ctx, amount)
    }

    pub fn set_mock_exchange_rate(ctx: Context<ManageCompound>, rate: u128) -> Result<bool> {
        instructions::compound::handler_set_mock_exchange_rate(ctx, rate)
    }

    pub fn set_slippage_tolerance(ctx: Context<ManageCompound>, bps: u32) -> Result<bool> {
        instructions::compound::handler_set_slippage_tolerance(ctx, bps)
    }

    /// Also turns mock mode off
    pub fn set_dex_contract(ctx: Context<ManageCompound>, dex: Pubkey) -> Result<bool> {
        instructions::compound::handler_set_dex_contract(ctx, dex)
    }

    pub fn enable_mock_dex_mode(ctx: Context<ManageCompound>) -> Result<bool> {
        instructions::compound::handler_enable_mock_dex_mode(ctx)
    }

    pub fn set_harvest_manager(ctx: Context<ManageCompound>, manager: Pubkey) -> Result<bool> {
        instructions::compound::handler_set_harvest_manager(ctx, manager)
    }

    pub fn set_compound_vault_core(
        ctx: Context<ManageCompound>,
        vault_core: Pubkey,
    ) -> Result<bool> {
        instructions::compound::handler_set_compound_vault_core(ctx, vault_core)
    }

    // =========================================================================
    // Views (return data only)
    // =========================================================================

    /// Share price scaled by 1e6
    pub fn get_share_price(ctx: Context<ViewVault>) -> Result<u128> {
        instructions::views::handler_get_share_price(ctx)
    }

    pub fn get_vault_summary(ctx: Context<ViewVault>) -> Result<VaultSummary> {
        instructions::views::handler_get_vault_summary(ctx)
    }

    /// Name, symbol, decimals and supply of the claim token
    pub fn get_claim_token_metadata(ctx: Context<ViewVault>) -> Result<ClaimTokenMetadata> {
        instructions::views::handler_get_claim_token_metadata(ctx)
    }

    /// None until the owner sets one
    pub fn get_token_uri(ctx: Context<ViewVault>) -> Result<Option<String>> {
        instructions::views::handler_get_token_uri(ctx)
    }

    pub fn preview_withdrawal(ctx: Context<ViewVault>, shares: u128) -> Result<WithdrawalQuote> {
        instructions::views::handler_preview_withdrawal(ctx, shares)
    }

    pub fn get_position_value(ctx: Context<ViewPosition>) -> Result<PositionSummary> {
        instructions::views::handler_get_position_value(ctx)
    }

    pub fn get_delegation_status(ctx: Context<ViewDelegation>) -> Result<DelegationStatus> {
        instructions::views::handler_get_delegation_status(ctx)
    }

    pub fn cycles_until_unlock(ctx: Context<ViewDelegation>) -> Result<u64> {
        instructions::views::handler_cycles_until_unlock(ctx)
    }

    pub fn is_unlocked(ctx: Context<ViewDelegation>) -> Result<bool> {
        instructions::views::handler_is_unlocked(ctx)
    }

    pub fn blocks_until_next_harvest(ctx: Context<ViewHarvest>) -> Result<u64> {
        instructions::views::handler_blocks_until_next_harvest(ctx)
    }

    pub fn get_pending_rewards(ctx: Context<ViewHarvest>) -> Result<u128> {
        instructions::views::handler_get_pending_rewards(ctx)
    }

    /// 0 for a cycle that was never recorded
    pub fn get_cycle_reward(ctx: Context<ViewCycleReward>, cycle_id: u64) -> Result<u128> {
        instructions::views::handler_get_cycle_reward(ctx, cycle_id)
    }

    pub fn is_cycle_harvested(ctx: Context<ViewCycleReward>, cycle_id: u64) -> Result<bool> {
        instructions::views::handler_is_cycle_harvested(ctx, cycle_id)
    }

    pub fn calculate_compound_impact(
        ctx: Context<ViewCompound>,
        amount: u128,
    ) -> Result<CompoundImpact> {
        instructions::views::handler_calculate_compound_impact(ctx, amount)
    }

    pub fn get_compound_record(
        ctx: Context<ViewCompoundRecord>,
        index: u64,
    ) -> Result<Option<CompoundRecord>> {
        instructions::views::handler_get_compound_record(ctx, index)
    }
}
