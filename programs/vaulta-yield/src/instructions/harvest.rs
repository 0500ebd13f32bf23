// =============================================================================
// Harvest Instructions
// =============================================================================
// Reward bookkeeping per completed cycle plus the permissionless harvest
// cadence gate.
//
// Each cycle's reward lives in its own CycleReward PDA keyed by cycle id, so
// the write-once rule holds across transactions.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{HarvestConfigUpdated, HarvestTriggered, RewardRecorded};
use crate::state::{CycleReward, HarvestLedger, Vault};

// =============================================================================
// Record Reward
// =============================================================================

#[derive(Accounts)]
#[instruction(cycle_id: u64)]
pub struct RecordReward<'info> {
    /// Harvest ledger owner, pays for the cycle entry
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.harvest_ledger @ VaultError::InvalidVaultAccount
    )]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + CycleReward::INIT_SPACE,
        seeds = [
            CYCLE_REWARD_SEED,
            harvest_ledger.key().as_ref(),
            &cycle_id.to_le_bytes()
        ],
        bump
    )]
    pub cycle_reward: Box<Account<'info, CycleReward>>,

    pub system_program: Program<'info, System>,
}

/// Returns the recorded amount.
pub fn handler_record_reward(
    ctx: Context<RecordReward>,
    cycle_id: u64,
    amount: u128,
) -> Result<u128> {
    let owner = ctx.accounts.owner.key();
    let ledger_key = ctx.accounts.harvest_ledger.key();
    let clock = Clock::get()?;

    let recorded = ctx.accounts.harvest_ledger.record_reward(
        &mut ctx.accounts.cycle_reward,
        owner,
        cycle_id,
        amount,
        clock.slot,
    )?;

    let entry = &mut ctx.accounts.cycle_reward;
    entry.harvest_ledger = ledger_key;
    entry.bump = ctx.bumps.cycle_reward;

    let ledger = &ctx.accounts.harvest_ledger;

    msg!("Reward recorded for cycle {}: {}", cycle_id, recorded);
    msg!("Total harvested: {}", ledger.total_harvested);
    msg!("Cycles recorded: {}", ledger.cycles_recorded);

    emit!(RewardRecorded {
        harvest_ledger: ledger_key,
        cycle_id,
        amount: recorded,
        total_harvested: ledger.total_harvested,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(recorded)
}

// =============================================================================
// Harvest (permissionless)
// =============================================================================

#[derive(Accounts)]
pub struct HarvestRewards<'info> {
    /// Anyone may trigger a harvest
    pub caller: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.harvest_ledger @ VaultError::InvalidVaultAccount
    )]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,
}

/// Returns the pending reward amount picked up by this harvest.
pub fn handler_harvest_rewards(ctx: Context<HarvestRewards>) -> Result<u128> {
    let clock = Clock::get()?;
    let ledger = &mut ctx.accounts.harvest_ledger;

    let pending = ledger.harvest_rewards(clock.slot)?;

    msg!("Harvest triggered by {}", ctx.accounts.caller.key());
    msg!("Pending rewards: {}", pending);
    msg!(
        "Next harvest allowed at slot {}",
        clock.slot.saturating_add(ledger.harvest_interval)
    );

    emit!(HarvestTriggered {
        harvest_ledger: ledger.key(),
        caller: ctx.accounts.caller.key(),
        pending,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(pending)
}

// =============================================================================
// Configuration
// =============================================================================

fn emit_config(ledger: &Account<HarvestLedger>) -> Result<()> {
    let clock = Clock::get()?;
    emit!(HarvestConfigUpdated {
        harvest_ledger: ledger.key(),
        harvest_interval: ledger.harvest_interval,
        stacking_strategy: ledger.stacking_strategy,
        compound_engine: ledger.compound_engine,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ManageHarvest<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.harvest_ledger @ VaultError::InvalidVaultAccount
    )]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,
}

pub fn handler_set_harvest_interval(ctx: Context<ManageHarvest>, blocks: u64) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.harvest_ledger;

    let old_interval = ledger.harvest_interval;
    ledger.set_harvest_interval(owner, blocks)?;

    msg!("Harvest interval updated: {} -> {}", old_interval, blocks);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_stacking_strategy(
    ctx: Context<ManageHarvest>,
    strategy: Pubkey,
) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.harvest_ledger;

    ledger.set_stacking_strategy(owner, strategy)?;

    msg!("Stacking strategy set to {}", strategy);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_compound_engine(ctx: Context<ManageHarvest>, engine: Pubkey) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.harvest_ledger;

    ledger.set_compound_engine(owner, engine)?;

    msg!("Compound engine set to {}", engine);

    emit_config(ledger)?;
    Ok(true)
}
