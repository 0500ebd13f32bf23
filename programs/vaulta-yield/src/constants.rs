// =============================================================================
// VaultaYield Protocol Constants
// =============================================================================
// Defaults, limits and PDA seeds for the vault and its four ledgers.
// Runtime-tunable values (fee rate, harvest interval, exchange rate,
// slippage) start from the defaults below and are changed through the
// owner-only setters.
// =============================================================================

// =============================================================================
// UNITS & PRECISION
// =============================================================================

/// Base asset uses 6 decimals: 1 whole unit = 1,000,000 base units
pub const BASE_UNIT: u128 = 1_000_000;

/// Share price is reported as a fixed-point integer with 6 decimals
/// A price of 1.0 reads as 1_000_000
pub const PRICE_PRECISION: u128 = 1_000_000;

/// Reward asset uses 8 decimals (sats): 1.0 reward unit = 100,000,000
pub const REWARD_UNIT_SCALE: u128 = 100_000_000;

/// Total basis points (100%) - denominator for every bps calculation
pub const BPS_DENOMINATOR: u128 = 10_000;

// =============================================================================
// VAULT FEES
// =============================================================================

/// Default withdrawal fee: 0.5%
pub const DEFAULT_WITHDRAWAL_FEE_BPS: u32 = 50;

/// Maximum withdrawal fee: 2%
pub const MAX_WITHDRAWAL_FEE_BPS: u32 = 200;

// =============================================================================
// DELEGATION
// =============================================================================

/// Height-units per reward cycle
pub const CYCLE_LENGTH: u64 = 2_100;

/// Minimum commitment: 100,000 whole units
pub const MIN_DELEGATION_AMOUNT: u128 = 100_000 * BASE_UNIT;

/// Lock duration bounds, in cycles
pub const MIN_LOCK_CYCLES: u64 = 1;
pub const MAX_LOCK_CYCLES: u64 = 12;

/// Length of a compressed public key used as the external reward address
pub const REWARD_ADDRESS_LEN: usize = 33;

// =============================================================================
// HARVEST
// =============================================================================

/// Default cooldown between harvest calls (~1 day at 10 minute heights)
pub const DEFAULT_HARVEST_INTERVAL: u64 = 144;

/// Smallest cooldown the owner may configure
pub const MIN_HARVEST_INTERVAL: u64 = 10;

// =============================================================================
// COMPOUND
// =============================================================================

/// Mock conversion rate: base units received per 1.0 reward unit
pub const DEFAULT_MOCK_RATE: u128 = 50_000;

/// Default slippage tolerance: 0.5%
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Maximum slippage tolerance: 5%
pub const MAX_SLIPPAGE_BPS: u32 = 500;

/// Performance fee on compounded proceeds: 2% (fixed)
pub const PERFORMANCE_FEE_BPS: u32 = 200;

// =============================================================================
// CLAIM TOKEN METADATA
// =============================================================================

pub const CLAIM_TOKEN_NAME: &str = "VaultaYield Shares";
pub const CLAIM_TOKEN_SYMBOL: &str = "vySTX";
pub const CLAIM_TOKEN_DECIMALS: u8 = 6;

/// Longest metadata URI the vault will store (bytes)
pub const MAX_TOKEN_URI_LEN: usize = 256;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Full seed: ["vault", base_mint_pubkey]
pub const VAULT_SEED: &[u8] = b"vault";

/// Token account holding pooled base asset and uncollected fees
/// Full seed: ["custody", vault_pubkey]
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Full seed: ["position", vault_pubkey, owner_pubkey]
pub const POSITION_SEED: &[u8] = b"position";

/// Full seed: ["fee_ledger", vault_pubkey]
pub const FEE_LEDGER_SEED: &[u8] = b"fee_ledger";

/// Full seed: ["delegation", vault_pubkey]
pub const DELEGATION_SEED: &[u8] = b"delegation";

/// Full seed: ["harvest_ledger", vault_pubkey]
pub const HARVEST_LEDGER_SEED: &[u8] = b"harvest_ledger";

/// Full seed: ["cycle_reward", harvest_ledger_pubkey, cycle_id (le bytes)]
pub const CYCLE_REWARD_SEED: &[u8] = b"cycle_reward";

/// Full seed: ["compound_ledger", vault_pubkey]
pub const COMPOUND_LEDGER_SEED: &[u8] = b"compound_ledger";

/// Full seed: ["compound_record", compound_ledger_pubkey, index (le bytes)]
pub const COMPOUND_RECORD_SEED: &[u8] = b"compound_record";
