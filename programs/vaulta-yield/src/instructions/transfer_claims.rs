// =============================================================================
// Transfer Claims Instruction
// =============================================================================
// Moves claim tokens between two positions of the same vault. Supply and
// pooled assets are untouched; the recipient's position is created on demand.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::ClaimsTransferred;
use crate::state::{Position, Vault};

#[derive(Accounts)]
pub struct TransferClaims<'info> {
    /// Owner of the sending position, pays for the recipient position if new
    #[account(mut)]
    pub sender: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.base_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, vault.key().as_ref(), sender.key().as_ref()],
        bump = sender_position.bump,
        constraint = sender_position.owner == sender.key() @ VaultError::NotAuthorized
    )]
    pub sender_position: Box<Account<'info, Position>>,

    /// CHECK: Only used as the owner key of the receiving position
    #[account(constraint = recipient.key() != sender.key() @ VaultError::SelfTransfer)]
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = sender,
        space = 8 + Position::INIT_SPACE,
        seeds = [POSITION_SEED, vault.key().as_ref(), recipient.key().as_ref()],
        bump
    )]
    pub recipient_position: Box<Account<'info, Position>>,

    pub system_program: Program<'info, System>,
}

pub fn handler_transfer_claims(ctx: Context<TransferClaims>, shares: u128) -> Result<bool> {
    let sender = ctx.accounts.sender.key();
    let recipient = ctx.accounts.recipient.key();
    let vault_key = ctx.accounts.vault.key();
    let clock = Clock::get()?;

    ctx.accounts
        .recipient_position
        .bind(vault_key, recipient, ctx.bumps.recipient_position);

    ctx.accounts.vault.transfer_claims(
        &mut ctx.accounts.sender_position,
        &mut ctx.accounts.recipient_position,
        sender,
        shares,
    )?;

    msg!("Transferred {} claims from {} to {}", shares, sender, recipient);
    msg!(
        "Sender balance: {}, recipient balance: {}",
        ctx.accounts.sender_position.claim_balance,
        ctx.accounts.recipient_position.claim_balance
    );

    emit!(ClaimsTransferred {
        vault: vault_key,
        from: sender,
        to: recipient,
        amount: shares,
        slot: clock.slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(true)
}
