// =============================================================================
// Delegation Instructions
// =============================================================================
// Drive the delegation state machine: Idle -> Locked on delegate, back to
// Idle on revoke once the unlock cycle is reached. While Locked the vault
// refuses withdrawals.
//
// Cycles are derived from the slot: cycle = slot / CYCLE_LENGTH.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{DelegationConfigUpdated, DelegationRevoked, Delegated};
use crate::state::{cycle_at, DelegationState, Vault};

/// Shared by every delegation instruction. The signer is checked against the
/// delegation's owner or vault ref by the state methods.
#[derive(Accounts)]
pub struct ManageDelegation<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [DELEGATION_SEED, vault.key().as_ref()],
        bump = delegation.bump,
        address = vault.delegation @ VaultError::InvalidVaultAccount
    )]
    pub delegation: Box<Account<'info, DelegationState>>,
}

fn emit_config(delegation: &Account<DelegationState>) -> Result<()> {
    let clock = Clock::get()?;
    emit!(DelegationConfigUpdated {
        delegation: delegation.key(),
        vault_ref: delegation.vault_ref,
        pool_operator: delegation.pool_operator,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

/// The only address allowed to open a delegation.
pub fn handler_set_vault_ref(ctx: Context<ManageDelegation>, vault_ref: Pubkey) -> Result<bool> {
    let authority = ctx.accounts.authority.key();
    let delegation = &mut ctx.accounts.delegation;

    delegation.set_vault_ref(authority, vault_ref)?;

    msg!("Delegation vault ref set to {}", vault_ref);

    emit_config(delegation)?;
    Ok(true)
}

pub fn handler_update_pool_operator(
    ctx: Context<ManageDelegation>,
    operator: Pubkey,
) -> Result<bool> {
    let authority = ctx.accounts.authority.key();
    let delegation = &mut ctx.accounts.delegation;

    delegation.update_pool_operator(authority, operator)?;

    msg!("Pool operator set to {}", operator);

    emit_config(delegation)?;
    Ok(true)
}

pub fn handler_set_reward_address(
    ctx: Context<ManageDelegation>,
    reward_address: [u8; REWARD_ADDRESS_LEN],
) -> Result<bool> {
    let authority = ctx.accounts.authority.key();
    let delegation = &mut ctx.accounts.delegation;

    delegation.set_reward_address(authority, reward_address)?;

    msg!("Reward address updated (version byte {})", reward_address[0]);

    emit_config(delegation)?;
    Ok(true)
}

// =============================================================================
// Lifecycle
// =============================================================================

pub fn handler_delegate(ctx: Context<ManageDelegation>, amount: u64, cycles: u64) -> Result<bool> {
    let authority = ctx.accounts.authority.key();
    let clock = Clock::get()?;
    let delegation = &mut ctx.accounts.delegation;

    delegation.delegate(authority, u128::from(amount), cycles, clock.slot)?;

    let operator = delegation.pool_operator.unwrap_or_default();

    msg!("Delegation LOCKED!");
    msg!("Amount: {}", amount);
    msg!("Operator: {}", operator);
    msg!(
        "Cycles: {} (cycle {} -> unlock at cycle {})",
        cycles,
        delegation.delegated_at_cycle,
        delegation.unlock_cycle
    );

    emit!(Delegated {
        delegation: delegation.key(),
        operator,
        amount: u128::from(amount),
        cycles,
        unlock_cycle: delegation.unlock_cycle,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(true)
}

pub fn handler_revoke(ctx: Context<ManageDelegation>) -> Result<bool> {
    let authority = ctx.accounts.authority.key();
    let clock = Clock::get()?;
    let delegation = &mut ctx.accounts.delegation;

    delegation.revoke(authority, clock.slot)?;

    let cycle = cycle_at(clock.slot);
    msg!("Delegation REVOKED at cycle {}", cycle);

    emit!(DelegationRevoked {
        delegation: delegation.key(),
        cycle,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(true)
}
