// =============================================================================
// Compound Instructions
// =============================================================================
// Convert harvested rewards into the base asset and configure how that
// conversion runs.
//
// Only the mock path converts anything: it applies `mock_rate`, takes the
// performance fee and appends a CompoundRecord. The real-exchange path is
// wired up but always reports DexNotSet.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{CompoundConfigUpdated, Compounded};
use crate::state::{CompoundImpact, CompoundLedger, CompoundRecord, Vault};

// =============================================================================
// Mock Conversion
// =============================================================================

#[derive(Accounts)]
pub struct ExecuteCompoundMock<'info> {
    /// Compound ledger owner, pays for the history record
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.compound_ledger @ VaultError::InvalidVaultAccount
    )]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,

    /// Next history entry, indexed from 1
    #[account(
        init,
        payer = owner,
        space = 8 + CompoundRecord::INIT_SPACE,
        seeds = [
            COMPOUND_RECORD_SEED,
            compound_ledger.key().as_ref(),
            &compound_ledger.total_compounds.saturating_add(1).to_le_bytes()
        ],
        bump
    )]
    pub compound_record: Box<Account<'info, CompoundRecord>>,

    pub system_program: Program<'info, System>,
}

pub fn handler_execute_compound_mock(
    ctx: Context<ExecuteCompoundMock>,
    amount: u128,
) -> Result<CompoundImpact> {
    let owner = ctx.accounts.owner.key();
    let ledger_key = ctx.accounts.compound_ledger.key();
    let clock = Clock::get()?;

    let impact = ctx.accounts.compound_ledger.execute_compound_mock(
        &mut ctx.accounts.compound_record,
        owner,
        amount,
        clock.slot,
    )?;

    let record = &mut ctx.accounts.compound_record;
    record.compound_ledger = ledger_key;
    record.bump = ctx.bumps.compound_record;

    let ledger = &ctx.accounts.compound_ledger;

    msg!("Compound #{} executed (mock)", record.index);
    msg!("Reward in: {}", amount);
    msg!(
        "Gross: {}, fee: {}, net: {}",
        impact.gross,
        impact.fee,
        impact.net
    );
    msg!("Total compounded: {}", ledger.total_compounded);

    emit!(Compounded {
        compound_ledger: ledger_key,
        index: record.index,
        reward_amount: amount,
        gross: impact.gross,
        fee: impact.fee,
        net: impact.net,
        total_compounded: ledger.total_compounded,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(impact)
}

// =============================================================================
// Real Conversion & Configuration
// =============================================================================

fn emit_config(ledger: &Account<CompoundLedger>) -> Result<()> {
    let clock = Clock::get()?;
    emit!(CompoundConfigUpdated {
        compound_ledger: ledger.key(),
        mock_rate: ledger.mock_rate,
        slippage_bps: ledger.slippage_bps,
        dex_ref: ledger.dex_ref,
        mock_mode: ledger.mock_mode,
        harvest_manager: ledger.harvest_manager,
        vault_core: ledger.vault_core,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ManageCompound<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.compound_ledger @ VaultError::InvalidVaultAccount
    )]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,
}

pub fn handler_execute_compound(
    ctx: Context<ManageCompound>,
    amount: u128,
) -> Result<CompoundImpact> {
    let owner = ctx.accounts.owner.key();
    ctx.accounts.compound_ledger.execute_compound(owner, amount)
}

pub fn handler_set_mock_exchange_rate(ctx: Context<ManageCompound>, rate: u128) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    let old_rate = ledger.mock_rate;
    ledger.set_mock_exchange_rate(owner, rate)?;

    msg!("Mock exchange rate updated: {} -> {}", old_rate, rate);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_slippage_tolerance(ctx: Context<ManageCompound>, bps: u32) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    let old_bps = ledger.slippage_bps;
    ledger.set_slippage_tolerance(owner, bps)?;

    msg!("Slippage tolerance updated: {} -> {} bps", old_bps, bps);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_dex_contract(ctx: Context<ManageCompound>, dex: Pubkey) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    ledger.set_dex_contract(owner, dex)?;

    msg!("Exchange set to {} (mock mode off)", dex);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_enable_mock_dex_mode(ctx: Context<ManageCompound>) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    ledger.enable_mock_dex_mode(owner)?;

    msg!("Mock exchange mode ENABLED");

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_harvest_manager(ctx: Context<ManageCompound>, manager: Pubkey) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    ledger.set_harvest_manager(owner, manager)?;

    msg!("Harvest manager set to {}", manager);

    emit_config(ledger)?;
    Ok(true)
}

pub fn handler_set_compound_vault_core(
    ctx: Context<ManageCompound>,
    vault_core: Pubkey,
) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let ledger = &mut ctx.accounts.compound_ledger;

    ledger.set_vault_core(owner, vault_core)?;

    msg!("Compound vault core set to {}", vault_core);

    emit_config(ledger)?;
    Ok(true)
}
