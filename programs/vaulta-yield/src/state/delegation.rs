// =============================================================================
// Delegation State Machine
// =============================================================================
// Tracks whether the pooled asset is committed to a time-locked yield cycle.
//
//        delegate (vault ref)             revoke (owner, cycle >= unlock)
//   Idle ---------------------> Locked ------------------------------> Idle
//
// Cycles are derived from the runtime height: cycle = height / CYCLE_LENGTH.
// The actual delegation to the external yield process is mocked; this
// account only records the commitment so the vault can gate withdrawals.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::DelegationError;

/// Cycle number for a given height.
pub fn cycle_at(height: u64) -> u64 {
    height / CYCLE_LENGTH
}

#[account]
#[derive(InitSpace, Default)]
pub struct DelegationState {
    /// The vault whose assets this account tracks
    pub vault: Pubkey,

    /// Configures operator/vault ref and revokes
    pub owner: Pubkey,

    /// The only address allowed to open a delegation
    pub vault_ref: Option<Pubkey>,

    /// Operator the pooled assets are delegated to
    pub pool_operator: Option<Pubkey>,

    /// External address rewards are paid to (compressed public key)
    pub reward_address: Option<[u8; 33]>,

    pub is_locked: bool,

    /// Amount committed by the active delegation (0 when idle)
    pub locked_amount: u128,

    /// Cycle at which the active delegation may be revoked
    pub unlock_cycle: u64,

    /// Cycle the active (or last) delegation started in
    pub delegated_at_cycle: u64,

    /// Completed delegate calls (analytics)
    pub delegation_count: u64,

    pub bump: u8,
}

/// Read-only snapshot returned by the status view.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DelegationStatus {
    pub is_locked: bool,
    pub amount: u128,
    pub unlock_cycle: u64,
    pub current_cycle: u64,
    pub pool_operator: Option<Pubkey>,
}

impl DelegationState {
    pub fn initialize(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        self.vault = vault;
        self.owner = owner;
        self.vault_ref = None;
        self.pool_operator = None;
        self.reward_address = None;
        self.is_locked = false;
        self.locked_amount = 0;
        self.unlock_cycle = 0;
        self.delegated_at_cycle = 0;
        self.delegation_count = 0;
        self.bump = bump;
    }

    pub(crate) fn ensure_owner(&self, caller: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.owner, DelegationError::NotAuthorized);
        Ok(())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_vault_ref(&mut self, caller: Pubkey, vault_ref: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.vault_ref = Some(vault_ref);
        Ok(true)
    }

    /// Operator cannot change mid-commitment.
    pub fn update_pool_operator(&mut self, caller: Pubkey, operator: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(!self.is_locked, DelegationError::Locked);
        self.pool_operator = Some(operator);
        Ok(true)
    }

    pub fn set_reward_address(
        &mut self,
        caller: Pubkey,
        reward_address: [u8; REWARD_ADDRESS_LEN],
    ) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.reward_address = Some(reward_address);
        Ok(true)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open a delegation of `amount` for `cycles` cycles.
    pub fn delegate(
        &mut self,
        caller: Pubkey,
        amount: u128,
        cycles: u64,
        current_height: u64,
    ) -> Result<bool> {
        require!(
            self.vault_ref == Some(caller),
            DelegationError::NotAuthorized
        );
        require!(!self.is_locked, DelegationError::AlreadyLocked);
        require!(
            amount >= MIN_DELEGATION_AMOUNT,
            DelegationError::InsufficientAmount
        );
        require!(
            (MIN_LOCK_CYCLES..=MAX_LOCK_CYCLES).contains(&cycles),
            DelegationError::InvalidCycleCount
        );
        require!(
            self.pool_operator.is_some(),
            DelegationError::PoolOperatorNotSet
        );

        let current_cycle = cycle_at(current_height);
        let unlock_cycle = current_cycle
            .checked_add(cycles)
            .ok_or(DelegationError::MathOverflow)?;
        let delegation_count = self
            .delegation_count
            .checked_add(1)
            .ok_or(DelegationError::MathOverflow)?;

        self.is_locked = true;
        self.locked_amount = amount;
        self.unlock_cycle = unlock_cycle;
        self.delegated_at_cycle = current_cycle;
        self.delegation_count = delegation_count;

        Ok(true)
    }

    /// Close the active delegation once its unlock cycle is reached.
    pub fn revoke(&mut self, caller: Pubkey, current_height: u64) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(self.is_locked, DelegationError::NotLocked);
        require!(
            cycle_at(current_height) >= self.unlock_cycle,
            DelegationError::StillLocked
        );

        self.is_locked = false;
        self.locked_amount = 0;

        Ok(true)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// The gate the vault consults before paying out withdrawals.
    pub fn is_unlocked(&self) -> bool {
        !self.is_locked
    }

    pub fn status(&self, current_height: u64) -> DelegationStatus {
        DelegationStatus {
            is_locked: self.is_locked,
            amount: self.locked_amount,
            unlock_cycle: self.unlock_cycle,
            current_cycle: cycle_at(current_height),
            pool_operator: self.pool_operator,
        }
    }

    /// Cycles left until `revoke` is allowed; 0 when idle or already due.
    pub fn cycles_until_unlock(&self, current_height: u64) -> u64 {
        if !self.is_locked {
            return 0;
        }
        self.unlock_cycle.saturating_sub(cycle_at(current_height))
    }
}
