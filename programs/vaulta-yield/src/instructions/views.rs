// =============================================================================
// View Instructions
// =============================================================================
// Read-only queries. Nothing is written; results come back through the
// transaction's return data, so clients read them with a simulated call.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{
    CompoundImpact, CompoundLedger, CompoundRecord, CycleReward, DelegationState,
    DelegationStatus, HarvestLedger, Position, Vault, WithdrawalQuote,
};

/// Snapshot of the share ledger.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultSummary {
    pub total_pooled_assets: u128,
    pub total_claim_supply: u128,
    pub share_price: u128,
    pub withdrawal_fee_bps: u32,
    pub paused: bool,
}

/// A depositor's claim balance and what it currently redeems for.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PositionSummary {
    pub owner: Pubkey,
    pub claim_balance: u128,
    pub value: u128,
    pub total_deposited: u128,
    pub total_withdrawn: u128,
}

/// Fungible-token style description of the claim token.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimTokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: u128,
    pub uri: Option<String>,
}

/// Deserialize a PDA that may not have been created yet. Empty or foreign
/// accounts read as `None`.
fn load_if_created<T: AccountDeserialize>(data: &[u8], owner: &Pubkey) -> Result<Option<T>> {
    if data.is_empty() || owner != &crate::ID {
        return Ok(None);
    }

    let account = T::try_deserialize(&mut &data[..])?;
    Ok(Some(account))
}

// =============================================================================
// Vault
// =============================================================================

#[derive(Accounts)]
pub struct ViewVault<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,
}

pub fn handler_get_share_price(ctx: Context<ViewVault>) -> Result<u128> {
    ctx.accounts.vault.share_price()
}

pub fn handler_get_vault_summary(ctx: Context<ViewVault>) -> Result<VaultSummary> {
    let vault = &ctx.accounts.vault;
    Ok(VaultSummary {
        total_pooled_assets: vault.total_pooled_assets,
        total_claim_supply: vault.total_claim_supply,
        share_price: vault.share_price()?,
        withdrawal_fee_bps: vault.withdrawal_fee_bps,
        paused: vault.paused,
    })
}

pub fn handler_get_claim_token_metadata(ctx: Context<ViewVault>) -> Result<ClaimTokenMetadata> {
    let vault = &ctx.accounts.vault;
    Ok(ClaimTokenMetadata {
        name: CLAIM_TOKEN_NAME.to_string(),
        symbol: CLAIM_TOKEN_SYMBOL.to_string(),
        decimals: CLAIM_TOKEN_DECIMALS,
        total_supply: vault.total_claim_supply,
        uri: vault.token_uri.clone(),
    })
}

pub fn handler_get_token_uri(ctx: Context<ViewVault>) -> Result<Option<String>> {
    Ok(ctx.accounts.vault.token_uri.clone())
}

pub fn handler_preview_withdrawal(ctx: Context<ViewVault>, shares: u128) -> Result<WithdrawalQuote> {
    ctx.accounts.vault.preview_withdrawal(shares)
}

#[derive(Accounts)]
pub struct ViewPosition<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        seeds = [POSITION_SEED, vault.key().as_ref(), position.owner.as_ref()],
        bump = position.bump
    )]
    pub position: Account<'info, Position>,
}

pub fn handler_get_position_value(ctx: Context<ViewPosition>) -> Result<PositionSummary> {
    let position = &ctx.accounts.position;
    Ok(PositionSummary {
        owner: position.owner,
        claim_balance: position.claim_balance,
        value: ctx.accounts.vault.position_value(position)?,
        total_deposited: position.total_deposited,
        total_withdrawn: position.total_withdrawn,
    })
}

// =============================================================================
// Delegation
// =============================================================================

#[derive(Accounts)]
pub struct ViewDelegation<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(address = vault.delegation @ VaultError::InvalidVaultAccount)]
    pub delegation: Box<Account<'info, DelegationState>>,
}

pub fn handler_get_delegation_status(ctx: Context<ViewDelegation>) -> Result<DelegationStatus> {
    let clock = Clock::get()?;
    Ok(ctx.accounts.delegation.status(clock.slot))
}

pub fn handler_cycles_until_unlock(ctx: Context<ViewDelegation>) -> Result<u64> {
    let clock = Clock::get()?;
    Ok(ctx.accounts.delegation.cycles_until_unlock(clock.slot))
}

pub fn handler_is_unlocked(ctx: Context<ViewDelegation>) -> Result<bool> {
    Ok(ctx.accounts.delegation.is_unlocked())
}

// =============================================================================
// Harvest
// =============================================================================

#[derive(Accounts)]
pub struct ViewHarvest<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(address = vault.harvest_ledger @ VaultError::InvalidVaultAccount)]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,
}

pub fn handler_blocks_until_next_harvest(ctx: Context<ViewHarvest>) -> Result<u64> {
    let clock = Clock::get()?;
    Ok(ctx.accounts.harvest_ledger.blocks_until_next_harvest(clock.slot))
}

pub fn handler_get_pending_rewards(ctx: Context<ViewHarvest>) -> Result<u128> {
    Ok(ctx.accounts.harvest_ledger.pending_rewards())
}

#[derive(Accounts)]
#[instruction(cycle_id: u64)]
pub struct ViewCycleReward<'info> {
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,

    /// CHECK: Derived from the cycle id; may not exist yet
    #[account(
        seeds = [
            CYCLE_REWARD_SEED,
            harvest_ledger.key().as_ref(),
            &cycle_id.to_le_bytes()
        ],
        bump
    )]
    pub cycle_reward: UncheckedAccount<'info>,
}

/// Recorded reward of `cycle_id`, 0 if the cycle was never recorded.
pub fn handler_get_cycle_reward(ctx: Context<ViewCycleReward>, _cycle_id: u64) -> Result<u128> {
    let info = &ctx.accounts.cycle_reward;
    let entry: Option<CycleReward> = load_if_created(&info.try_borrow_data()?, info.owner)?;
    Ok(entry.map_or(0, |entry| entry.reward()))
}

pub fn handler_is_cycle_harvested(ctx: Context<ViewCycleReward>, _cycle_id: u64) -> Result<bool> {
    let info = &ctx.accounts.cycle_reward;
    let entry: Option<CycleReward> = load_if_created(&info.try_borrow_data()?, info.owner)?;
    Ok(entry.is_some_and(|entry| entry.recorded))
}

// =============================================================================
// Compound
// =============================================================================

#[derive(Accounts)]
pub struct ViewCompound<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(address = vault.compound_ledger @ VaultError::InvalidVaultAccount)]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,
}

pub fn handler_calculate_compound_impact(
    ctx: Context<ViewCompound>,
    amount: u128,
) -> Result<CompoundImpact> {
    ctx.accounts.compound_ledger.calculate_impact(amount)
}

#[derive(Accounts)]
#[instruction(index: u64)]
pub struct ViewCompoundRecord<'info> {
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,

    /// CHECK: Derived from the history index; may not exist
    #[account(
        seeds = [
            COMPOUND_RECORD_SEED,
            compound_ledger.key().as_ref(),
            &index.to_le_bytes()
        ],
        bump
    )]
    pub compound_record: UncheckedAccount<'info>,
}

/// History entry `index`, or None if no such conversion happened.
pub fn handler_get_compound_record(
    ctx: Context<ViewCompoundRecord>,
    _index: u64,
) -> Result<Option<CompoundRecord>> {
    let info = &ctx.accounts.compound_record;
    load_if_created(&info.try_borrow_data()?, info.owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_bytes(recorded: bool) -> Vec<u8> {
        let entry = CycleReward {
            harvest_ledger: Pubkey::new_from_array([5; 32]),
            cycle_id: 3,
            amount: 100_000_000,
            recorded,
            recorded_at_height: 6_300,
            bump: 255,
        };
        let mut data = Vec::new();
        entry.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn missing_pda_reads_as_none() {
        let entry: Option<CycleReward> = load_if_created(&[], &crate::ID).unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn foreign_account_reads_as_none() {
        let data = entry_bytes(true);
        let foreign = Pubkey::new_from_array([9; 32]);
        let entry: Option<CycleReward> = load_if_created(&data, &foreign).unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn recorded_cycle_is_harvested() {
        let data = entry_bytes(true);
        let entry: Option<CycleReward> = load_if_created(&data, &crate::ID).unwrap();
        let entry = entry.unwrap();
        assert!(entry.recorded);
        assert_eq!(entry.reward(), 100_000_000);
    }

    #[test]
    fn wrong_account_type_is_rejected() {
        let data = entry_bytes(true);
        let record: Result<Option<CompoundRecord>> = load_if_created(&data, &crate::ID);
        assert!(record.is_err());
    }
}
