use anchor_lang::prelude::*;

// =============================================================================
// Vault
// =============================================================================

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub base_mint: Pubkey,
    pub withdrawal_fee_bps: u32,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub amount: u128,
    pub claims_minted: u128,
    pub total_pooled_assets: u128,
    pub total_claim_supply: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub claims_burned: u128,
    pub gross: u128,
    pub fee: u128,
    pub net: u128,
    pub total_pooled_assets: u128,
    pub total_claim_supply: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct ClaimsTransferred {
    pub vault: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct CompoundCredited {
    pub vault: Pubkey,
    pub amount: u128,
    pub total_pooled_assets: u128,
    pub share_price: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultConfigUpdated {
    pub vault: Pubkey,
    pub withdrawal_fee_bps: u32,
    pub paused: bool,
    pub owner: Pubkey,
    pub slot: u64,
    pub timestamp: i64,
}

// =============================================================================
// Fee Ledger
// =============================================================================

#[event]
pub struct TokenUriUpdated {
    pub vault: Pubkey,
    pub token_uri: Option<String>,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeeCollected {
    pub fee_ledger: Pubkey,
    pub amount: u128,
    pub accumulated: u128,
    pub lifetime_total: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeeLedgerConfigUpdated {
    pub fee_ledger: Pubkey,
    pub authorized_caller: Option<Pubkey>,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeesWithdrawn {
    pub fee_ledger: Pubkey,
    pub recipient: Pubkey,
    pub amount: u128,
    pub lifetime_total: u128,
    pub slot: u64,
    pub timestamp: i64,
}

// =============================================================================
// Delegation
// =============================================================================

#[event]
pub struct Delegated {
    pub delegation: Pubkey,
    pub operator: Pubkey,
    pub amount: u128,
    pub cycles: u64,
    pub unlock_cycle: u64,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct DelegationRevoked {
    pub delegation: Pubkey,
    pub cycle: u64,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct DelegationConfigUpdated {
    pub delegation: Pubkey,
    pub vault_ref: Option<Pubkey>,
    pub pool_operator: Option<Pubkey>,
    pub slot: u64,
    pub timestamp: i64,
}

// =============================================================================
// Harvest
// =============================================================================

#[event]
pub struct RewardRecorded {
    pub harvest_ledger: Pubkey,
    pub cycle_id: u64,
    pub amount: u128,
    pub total_harvested: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct HarvestTriggered {
    pub harvest_ledger: Pubkey,
    pub caller: Pubkey,
    pub pending: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct HarvestConfigUpdated {
    pub harvest_ledger: Pubkey,
    pub harvest_interval: u64,
    pub stacking_strategy: Option<Pubkey>,
    pub compound_engine: Option<Pubkey>,
    pub slot: u64,
    pub timestamp: i64,
}

// =============================================================================
// Compound
// =============================================================================

#[event]
pub struct Compounded {
    pub compound_ledger: Pubkey,
    pub index: u64,
    pub reward_amount: u128,
    pub gross: u128,
    pub fee: u128,
    pub net: u128,
    pub total_compounded: u128,
    pub slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct CompoundConfigUpdated {
    pub compound_ledger: Pubkey,
    pub mock_rate: u128,
    pub slippage_bps: u32,
    pub dex_ref: Option<Pubkey>,
    pub mock_mode: bool,
    pub harvest_manager: Option<Pubkey>,
    pub vault_core: Option<Pubkey>,
    pub slot: u64,
    pub timestamp: i64,
}
