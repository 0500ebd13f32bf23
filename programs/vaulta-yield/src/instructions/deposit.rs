// =============================================================================
// Deposit Instruction
// =============================================================================
// Pools base asset into the vault and credits claim tokens to the
// depositor's position.
//
// Flow:
// 1. Position is created on first deposit and bound to (vault, depositor)
// 2. Vault computes the claims to mint and updates pooled accounting
// 3. Base asset moves from the depositor into custody
//
// Claim calculation:
// - Empty vault: claims = amount (1:1)
// - Otherwise:   claims = amount * total_claim_supply / total_pooled_assets
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Deposited;
use crate::state::{Position, Vault};
use crate::utils::pay_into_custody;

#[derive(Accounts)]
pub struct DepositToVault<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    #[account(mut)]
    pub depositor: Signer<'info>,

    // =========================================================================
    // Vault Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// Created on the depositor's first deposit into this vault
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + Position::INIT_SPACE,
        seeds = [POSITION_SEED, vault.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, Position>>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Source of the deposited base asset
    #[account(
        mut,
        constraint = depositor_token_account.mint == vault.base_mint @ VaultError::InvalidBaseMint,
        constraint = depositor_token_account.owner == depositor.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub depositor_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = vault.custody @ VaultError::InvalidVaultAccount
    )]
    pub custody: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Returns the claim tokens minted.
pub fn handler_deposit(ctx: Context<DepositToVault>, amount: u64) -> Result<u128> {
    let depositor = ctx.accounts.depositor.key();
    let vault_key = ctx.accounts.vault.key();
    let clock = Clock::get()?;

    ctx.accounts
        .position
        .bind(vault_key, depositor, ctx.bumps.position);

    // =========================================================================
    // Update Ledger
    // =========================================================================

    let minted = ctx.accounts.vault.deposit(
        &mut ctx.accounts.position,
        depositor,
        u128::from(amount),
        clock.slot,
    )?;

    // =========================================================================
    // Transfer Base Asset: Depositor -> Custody
    // =========================================================================

    require!(
        ctx.accounts.depositor_token_account.amount >= amount,
        VaultError::InsufficientBalance
    );

    pay_into_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.depositor_token_account.to_account_info(),
        ctx.accounts.custody.to_account_info(),
        ctx.accounts.depositor.to_account_info(),
        amount,
    )?;

    let vault = &ctx.accounts.vault;

    msg!("Deposit successful!");
    msg!("Amount deposited: {}", amount);
    msg!("Claims minted: {}", minted);
    msg!("Position balance: {}", ctx.accounts.position.claim_balance);
    msg!("Total pooled assets: {}", vault.total_pooled_assets);
    msg!("Total claim supply: {}", vault.total_claim_supply);

    emit!(Deposited {
        vault: vault_key,
        user: depositor,
        amount: u128::from(amount),
        claims_minted: minted,
        total_pooled_assets: vault.total_pooled_assets,
        total_claim_supply: vault.total_claim_supply,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(minted)
}
