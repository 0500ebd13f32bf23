// =============================================================================
// Withdraw Instruction
// =============================================================================
// Burns claim tokens and pays the depositor their share of the pool, minus
// the withdrawal fee.
//
// Flow:
// 1. Vault checks the pause gate, balance and delegation unlock gate
// 2. gross = shares * total_pooled_assets / total_claim_supply
// 3. fee   = gross * withdrawal_fee_bps / 10000, booked in the fee ledger
// 4. net   = gross - fee, paid from custody
//
// The fee stays in custody until the owner collects it, outside of pooled
// assets, so it is never socialized to remaining holders.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{FeeCollected, Withdrawn};
use crate::state::{DelegationState, FeeLedger, Position, Vault};
use crate::utils::{pay_from_custody, to_token_amount};

#[derive(Accounts)]
pub struct WithdrawFromVault<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    #[account(mut)]
    pub withdrawer: Signer<'info>,

    // =========================================================================
    // Vault Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, vault.key().as_ref(), withdrawer.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == withdrawer.key() @ VaultError::NotAuthorized
    )]
    pub position: Box<Account<'info, Position>>,

    /// Receives the withdrawal fee booking
    #[account(
        mut,
        address = vault.fee_ledger @ VaultError::InvalidVaultAccount
    )]
    pub fee_ledger: Box<Account<'info, FeeLedger>>,

    /// Consulted for the unlock gate
    #[account(address = vault.delegation @ VaultError::InvalidVaultAccount)]
    pub delegation: Box<Account<'info, DelegationState>>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Destination for the net payout
    #[account(
        mut,
        constraint = withdrawer_token_account.mint == vault.base_mint @ VaultError::InvalidBaseMint,
        constraint = withdrawer_token_account.owner == withdrawer.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub withdrawer_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = vault.custody @ VaultError::InvalidVaultAccount
    )]
    pub custody: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Returns the net amount paid out.
pub fn handler_withdraw(ctx: Context<WithdrawFromVault>, shares: u128) -> Result<u128> {
    let withdrawer = ctx.accounts.withdrawer.key();
    let vault_key = ctx.accounts.vault.key();
    let clock = Clock::get()?;

    // =========================================================================
    // Update Ledgers
    // =========================================================================

    let quote = ctx.accounts.vault.withdraw(
        &mut ctx.accounts.position,
        &mut ctx.accounts.fee_ledger,
        &ctx.accounts.delegation,
        vault_key,
        withdrawer,
        shares,
        clock.slot,
    )?;

    let payout = to_token_amount(quote.net)?;
    require!(
        ctx.accounts.custody.amount >= payout,
        VaultError::InsufficientBalance
    );

    msg!(
        "Withdrawing {} (fee {}) for {} claims",
        quote.net,
        quote.fee,
        shares
    );

    // =========================================================================
    // Transfer Base Asset: Custody -> Withdrawer
    // =========================================================================

    if payout > 0 {
        pay_from_custody(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.custody.to_account_info(),
            ctx.accounts.withdrawer_token_account.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.vault.base_mint,
            ctx.accounts.vault.bump,
            payout,
        )?;
    }

    let vault = &ctx.accounts.vault;

    msg!("Withdrawal successful!");
    msg!("Claims burned: {}", shares);
    msg!("Gross: {}, fee: {}, net: {}", quote.gross, quote.fee, quote.net);
    msg!("Total pooled assets: {}", vault.total_pooled_assets);
    msg!("Total claim supply: {}", vault.total_claim_supply);
    msg!("Fees accumulated: {}", ctx.accounts.fee_ledger.accumulated);

    if quote.fee > 0 {
        let fee_ledger = &ctx.accounts.fee_ledger;
        emit!(FeeCollected {
            fee_ledger: fee_ledger.key(),
            amount: quote.fee,
            accumulated: fee_ledger.accumulated,
            lifetime_total: fee_ledger.lifetime_total,
            slot: clock.slot,
            timestamp: clock.unix_timestamp,
        });
    }

    emit!(Withdrawn {
        vault: vault_key,
        user: withdrawer,
        claims_burned: shares,
        gross: quote.gross,
        fee: quote.fee,
        net: quote.net,
        total_pooled_assets: vault.total_pooled_assets,
        total_claim_supply: vault.total_claim_supply,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(quote.net)
}
