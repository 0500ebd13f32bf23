// =============================================================================
// Harvest Ledger
// =============================================================================
// Records the externally-reported reward of each completed cycle and gates
// how often the permissionless harvest call may run.
//
// - `record_reward` is write-once per cycle: a second report for the same
//   cycle (even with a different amount) is rejected, so one real-world
//   payout can never be counted twice.
// - `last_harvest_cycle` is the LAST cycle written, not the highest one.
//   Recording cycle 5 then cycle 3 leaves it at 3.
// - `last_harvest_height == 0` means "never harvested", so the very first
//   harvest call is always allowed.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::HarvestError;

#[account]
#[derive(InitSpace, Default)]
pub struct HarvestLedger {
    pub vault: Pubkey,

    /// Records rewards and tunes the interval
    pub owner: Pubkey,

    /// Delegation account rewards are sourced from
    pub stacking_strategy: Option<Pubkey>,

    /// Compound ledger harvested rewards are handed to
    pub compound_engine: Option<Pubkey>,

    /// Sum of all recorded cycle rewards (reward asset units)
    pub total_harvested: u128,

    /// Last cycle recorded (last write wins, see module docs)
    pub last_harvest_cycle: u64,

    /// Height of the last successful `harvest_rewards` call
    pub last_harvest_height: u64,

    /// Minimum height-units between harvest calls
    pub harvest_interval: u64,

    /// Number of cycles recorded
    pub cycles_recorded: u64,

    pub bump: u8,
}

/// One entry of the cycle → reward mapping.
///
/// PDA derived from ["cycle_reward", harvest_ledger_pubkey, cycle_id].
#[account]
#[derive(InitSpace, Default)]
pub struct CycleReward {
    pub harvest_ledger: Pubkey,
    pub cycle_id: u64,
    pub amount: u128,
    pub recorded: bool,
    pub recorded_at_height: u64,
    pub bump: u8,
}

impl CycleReward {
    /// Recorded amount, or 0 for a cycle that was never recorded.
    pub fn reward(&self) -> u128 {
        if self.recorded {
            self.amount
        } else {
            0
        }
    }
}

impl HarvestLedger {
    pub fn initialize(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        self.vault = vault;
        self.owner = owner;
        self.stacking_strategy = None;
        self.compound_engine = None;
        self.total_harvested = 0;
        self.last_harvest_cycle = 0;
        self.last_harvest_height = 0;
        self.harvest_interval = DEFAULT_HARVEST_INTERVAL;
        self.cycles_recorded = 0;
        self.bump = bump;
    }

    pub(crate) fn ensure_owner(&self, caller: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.owner, HarvestError::NotAuthorized);
        Ok(())
    }

    /// Record the reward paid out for `cycle_id` into `entry`.
    pub fn record_reward(
        &mut self,
        entry: &mut CycleReward,
        caller: Pubkey,
        cycle_id: u64,
        amount: u128,
        current_height: u64,
    ) -> Result<u128> {
        self.ensure_owner(caller)?;
        require!(amount > 0, HarvestError::ZeroAmount);
        require!(!entry.recorded, HarvestError::CycleAlreadyRecorded);

        let total_harvested = self
            .total_harvested
            .checked_add(amount)
            .ok_or(HarvestError::MathOverflow)?;
        let cycles_recorded = self
            .cycles_recorded
            .checked_add(1)
            .ok_or(HarvestError::MathOverflow)?;

        entry.cycle_id = cycle_id;
        entry.amount = amount;
        entry.recorded = true;
        entry.recorded_at_height = current_height;

        self.total_harvested = total_harvested;
        self.cycles_recorded = cycles_recorded;
        self.last_harvest_cycle = cycle_id;

        Ok(amount)
    }

    /// Permissionless cadence gate. Returns the pending reward amount, which
    /// is always zero while reward discovery is mocked.
    pub fn harvest_rewards(&mut self, current_height: u64) -> Result<u128> {
        require!(self.can_harvest(current_height), HarvestError::TooSoon);

        self.last_harvest_height = current_height;

        Ok(self.pending_rewards())
    }

    pub fn set_harvest_interval(&mut self, caller: Pubkey, blocks: u64) -> Result<bool> {
        self.ensure_owner(caller)?;
        require!(
            blocks >= MIN_HARVEST_INTERVAL,
            HarvestError::IntervalTooShort
        );
        self.harvest_interval = blocks;
        Ok(true)
    }

    pub fn set_stacking_strategy(&mut self, caller: Pubkey, strategy: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.stacking_strategy = Some(strategy);
        Ok(true)
    }

    pub fn set_compound_engine(&mut self, caller: Pubkey, engine: Pubkey) -> Result<bool> {
        self.ensure_owner(caller)?;
        self.compound_engine = Some(engine);
        Ok(true)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Rewards waiting to be harvested. Real discovery belongs to an external
    /// reward source; in mock mode nothing is ever pending.
    pub fn pending_rewards(&self) -> u128 {
        0
    }

    fn has_harvested(&self) -> bool {
        self.last_harvest_height != 0
    }

    pub fn can_harvest(&self, current_height: u64) -> bool {
        !self.has_harvested()
            || current_height.saturating_sub(self.last_harvest_height) >= self.harvest_interval
    }

    pub fn blocks_until_next_harvest(&self, current_height: u64) -> u64 {
        if !self.has_harvested() {
            return 0;
        }
        let elapsed = current_height.saturating_sub(self.last_harvest_height);
        self.harvest_interval.saturating_sub(elapsed)
    }
}
