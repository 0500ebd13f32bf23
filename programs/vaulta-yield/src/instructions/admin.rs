// =============================================================================
// Admin Instructions
// =============================================================================
// Owner-only vault operations: fee rate, pause gate, ownership, fee
// collection and crediting compounded proceeds back into the pool.
//
// Ownership is checked by the ledger methods themselves, so a wrong signer
// fails with the ledger's own NotAuthorized error.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{
    CompoundCredited, FeeLedgerConfigUpdated, FeesWithdrawn, TokenUriUpdated, VaultConfigUpdated,
};
use crate::state::{
    CompoundLedger, DelegationState, FeeLedger, HarvestLedger, OwnedLedgers, Vault,
};
use crate::utils::{pay_from_custody, pay_into_custody, to_token_amount};

fn emit_config(vault: &Account<Vault>) -> Result<()> {
    let clock = Clock::get()?;
    emit!(VaultConfigUpdated {
        vault: vault.key(),
        withdrawal_fee_bps: vault.withdrawal_fee_bps,
        paused: vault.paused,
        owner: vault.owner,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

// =============================================================================
// Vault Configuration
// =============================================================================

/// Shared by set_withdrawal_fee, pause_vault, unpause_vault and
/// set_token_uri.
#[derive(Accounts)]
pub struct VaultAdmin<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,
}

pub fn handler_set_withdrawal_fee(ctx: Context<VaultAdmin>, bps: u32) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    let old_bps = vault.withdrawal_fee_bps;
    vault.set_withdrawal_fee(owner, bps)?;

    msg!("Withdrawal fee updated: {} -> {} bps", old_bps, bps);

    emit_config(vault)?;
    Ok(true)
}

pub fn handler_pause_vault(ctx: Context<VaultAdmin>) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    vault.pause(owner)?;

    msg!("Vault PAUSED by owner {}", owner);

    emit_config(vault)?;
    Ok(true)
}

pub fn handler_unpause_vault(ctx: Context<VaultAdmin>) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let vault = &mut ctx.accounts.vault;

    vault.unpause(owner)?;

    msg!("Vault UNPAUSED by owner {}", owner);

    emit_config(vault)?;
    Ok(true)
}

pub fn handler_set_token_uri(ctx: Context<VaultAdmin>, uri: Option<String>) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let clock = Clock::get()?;
    let vault = &mut ctx.accounts.vault;

    vault.set_token_uri(owner, uri)?;

    match &vault.token_uri {
        Some(uri) => msg!("Token URI set to {}", uri),
        None => msg!("Token URI cleared"),
    }

    emit!(TokenUriUpdated {
        vault: vault.key(),
        token_uri: vault.token_uri.clone(),
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(true)
}

// =============================================================================
// Ownership
// =============================================================================

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.fee_ledger @ VaultError::InvalidVaultAccount
    )]
    pub fee_ledger: Box<Account<'info, FeeLedger>>,

    #[account(
        mut,
        address = vault.delegation @ VaultError::InvalidVaultAccount
    )]
    pub delegation: Box<Account<'info, DelegationState>>,

    #[account(
        mut,
        address = vault.harvest_ledger @ VaultError::InvalidVaultAccount
    )]
    pub harvest_ledger: Box<Account<'info, HarvestLedger>>,

    #[account(
        mut,
        address = vault.compound_ledger @ VaultError::InvalidVaultAccount
    )]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,
}

/// Single-step handover of the vault together with its four ledgers.
pub fn handler_transfer_ownership(
    mut ctx: Context<TransferOwnership>,
    new_owner: Pubkey,
) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let accounts = &mut ctx.accounts;

    accounts.vault.transfer_ownership(
        OwnedLedgers {
            fee_ledger: &mut accounts.fee_ledger,
            delegation: &mut accounts.delegation,
            harvest_ledger: &mut accounts.harvest_ledger,
            compound_ledger: &mut accounts.compound_ledger,
        },
        owner,
        new_owner,
    )?;

    msg!("Vault ownership transferred!");
    msg!("Old owner: {}", owner);
    msg!("New owner: {}", accounts.vault.owner);

    emit_config(&accounts.vault)?;
    Ok(true)
}

// =============================================================================
// Fee Collection
// =============================================================================

#[derive(Accounts)]
pub struct CollectFees<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.fee_ledger @ VaultError::InvalidVaultAccount
    )]
    pub fee_ledger: Box<Account<'info, FeeLedger>>,

    #[account(
        mut,
        address = vault.custody @ VaultError::InvalidVaultAccount
    )]
    pub custody: Account<'info, TokenAccount>,

    /// Any base-asset token account chosen by the owner
    #[account(
        mut,
        constraint = recipient_token_account.mint == vault.base_mint @ VaultError::InvalidBaseMint
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Returns the amount swept to the recipient.
pub fn handler_collect_fees(ctx: Context<CollectFees>) -> Result<u128> {
    let owner = ctx.accounts.owner.key();
    let clock = Clock::get()?;

    let amount = ctx
        .accounts
        .vault
        .collect_fees(&mut ctx.accounts.fee_ledger, owner)?;

    pay_from_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.custody.to_account_info(),
        ctx.accounts.recipient_token_account.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.vault.base_mint,
        ctx.accounts.vault.bump,
        to_token_amount(amount)?,
    )?;

    let fee_ledger = &ctx.accounts.fee_ledger;

    msg!("Fees collected: {}", amount);
    msg!("Recipient: {}", ctx.accounts.recipient_token_account.key());
    msg!("Lifetime fees: {}", fee_ledger.lifetime_total);

    emit!(FeesWithdrawn {
        fee_ledger: fee_ledger.key(),
        recipient: ctx.accounts.recipient_token_account.key(),
        amount,
        lifetime_total: fee_ledger.lifetime_total,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(amount)
}

#[derive(Accounts)]
pub struct ManageFeeLedger<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        address = vault.fee_ledger @ VaultError::InvalidVaultAccount
    )]
    pub fee_ledger: Account<'info, FeeLedger>,
}

/// Re-point the fee ledger's authorized caller.
pub fn handler_set_fee_ledger_vault(
    ctx: Context<ManageFeeLedger>,
    vault_core: Pubkey,
) -> Result<bool> {
    let owner = ctx.accounts.owner.key();
    let clock = Clock::get()?;
    let fee_ledger = &mut ctx.accounts.fee_ledger;

    fee_ledger.set_vault_core(owner, vault_core)?;

    msg!("Fee ledger authorized caller set to {}", vault_core);

    emit!(FeeLedgerConfigUpdated {
        fee_ledger: fee_ledger.key(),
        authorized_caller: fee_ledger.authorized_caller,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(true)
}

// =============================================================================
// Compound Credit-Back
// =============================================================================

#[derive(Accounts)]
pub struct CreditCompounded<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        address = vault.compound_ledger @ VaultError::InvalidVaultAccount
    )]
    pub compound_ledger: Box<Account<'info, CompoundLedger>>,

    /// Holds the converted proceeds being credited
    #[account(
        mut,
        constraint = owner_token_account.mint == vault.base_mint @ VaultError::InvalidBaseMint,
        constraint = owner_token_account.owner == owner.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = vault.custody @ VaultError::InvalidVaultAccount
    )]
    pub custody: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Returns the share price after crediting.
pub fn handler_credit_compounded(ctx: Context<CreditCompounded>, amount: u64) -> Result<u128> {
    let owner = ctx.accounts.owner.key();
    let clock = Clock::get()?;

    let share_price = ctx.accounts.vault.credit_compounded(
        &mut ctx.accounts.compound_ledger,
        owner,
        u128::from(amount),
    )?;

    pay_into_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.owner_token_account.to_account_info(),
        ctx.accounts.custody.to_account_info(),
        ctx.accounts.owner.to_account_info(),
        amount,
    )?;

    let vault = &ctx.accounts.vault;

    msg!("Compounded proceeds credited: {}", amount);
    msg!("Total pooled assets: {}", vault.total_pooled_assets);
    msg!("Share price: {}", share_price);
    msg!(
        "Uncredited proceeds left: {}",
        ctx.accounts.compound_ledger.uncredited()
    );

    emit!(CompoundCredited {
        vault: vault.key(),
        amount: u128::from(amount),
        total_pooled_assets: vault.total_pooled_assets,
        share_price,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(share_price)
}
