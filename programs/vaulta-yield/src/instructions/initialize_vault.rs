// =============================================================================
// Initialize Vault Instruction
// =============================================================================
// Creates the vault for one base asset together with its custody account and
// the four ledgers it works with. Everything starts zeroed with default
// parameters; the signer becomes the owner of all five accounts.
//
// The fee ledger trusts the vault account as its only fee booker. The
// delegation vault ref and pool operator stay unset until the owner picks them.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::events::VaultInitialized;
use crate::state::{CompoundLedger, DelegationState, FeeLedger, HarvestLedger, Vault, VaultLinks};

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    /// Becomes the owner of the vault and every ledger
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, base_mint.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// The base asset depositors pool
    pub base_mint: Account<'info, Mint>,

    /// Holds pooled assets and uncollected fees; the vault PDA signs for it
    #[account(
        init,
        payer = owner,
        token::mint = base_mint,
        token::authority = vault,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump
    )]
    pub custody: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        space = 8 + FeeLedger::INIT_SPACE,
        seeds = [FEE_LEDGER_SEED, vault.key().as_ref()],
        bump
    )]
    pub fee_ledger: Box<Account<'info, FeeLedger>>,

    #[account(
        init,
        payer = owner,
        space = 8 + DelegationState::INIT_SPACE,
        seeds = [DELEGATION_SEED, vault.key().as_ref()],
        bump
    )]
    pub delegation: Box<Account<'info, DelegationState>>,

    #[account(
        init,
        payer = owner,
        space = 8 + HarvestLedger::INIT_SPACE,
        seeds = [HARVEST_LEDGER_SEED, vault.key().as_ref()],
        bump
    )]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,

    #[account(
        init,
        payer = owner,
        space = 8 + CompoundLedger::INIT_SPACE,
        seeds = [COMPOUND_LEDGER_SEED, vault.key().as_ref()],
        bump
    )]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler_initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let vault_key = ctx.accounts.vault.key();
    let clock = Clock::get()?;

    let links = VaultLinks {
        base_mint: ctx.accounts.base_mint.key(),
        custody: ctx.accounts.custody.key(),
        fee_ledger: ctx.accounts.fee_ledger.key(),
        delegation: ctx.accounts.delegation.key(),
        harvest_ledger: ctx.accounts.harvest_ledger.key(),
        compound_ledger: ctx.accounts.compound_ledger.key(),
    };

    ctx.accounts
        .vault
        .initialize(owner, links, ctx.bumps.vault, ctx.bumps.custody);

    ctx.accounts
        .fee_ledger
        .initialize(vault_key, owner, ctx.bumps.fee_ledger);

    ctx.accounts
        .delegation
        .initialize(vault_key, owner, ctx.bumps.delegation);

    let harvest_ledger = &mut ctx.accounts.harvest_ledger;
    harvest_ledger.initialize(vault_key, owner, ctx.bumps.harvest_ledger);
    harvest_ledger.set_stacking_strategy(owner, ctx.accounts.delegation.key())?;
    harvest_ledger.set_compound_engine(owner, ctx.accounts.compound_ledger.key())?;

    let compound_ledger = &mut ctx.accounts.compound_ledger;
    compound_ledger.initialize(vault_key, owner, ctx.bumps.compound_ledger);
    compound_ledger.set_harvest_manager(owner, ctx.accounts.harvest_ledger.key())?;
    compound_ledger.set_vault_core(owner, vault_key)?;

    let vault = &ctx.accounts.vault;

    msg!("VaultaYield vault initialized!");
    msg!("Vault: {}", vault_key);
    msg!("Owner: {}", owner);
    msg!("Base mint: {}", vault.base_mint);
    msg!("Custody: {}", vault.custody);
    msg!("Withdrawal fee: {} bps", vault.withdrawal_fee_bps);

    emit!(VaultInitialized {
        vault: vault_key,
        owner,
        base_mint: vault.base_mint,
        withdrawal_fee_bps: vault.withdrawal_fee_bps,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
