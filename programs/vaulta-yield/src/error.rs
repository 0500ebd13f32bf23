// =============================================================================
// VaultaYield Error Codes
// =============================================================================
// Each ledger owns a small closed error enum. The enums use distinct numeric
// offsets so a code seen in transaction logs identifies both the ledger and
// the failure:
//
//   VaultError        6000+
//   FeeError          6100+
//   DelegationError   6200+
//   HarvestError      6300+
//   CompoundError     6400+
// =============================================================================

use anchor_lang::prelude::*;

/// Errors raised by the vault (share ledger, pause gate, custody).
#[error_code]
pub enum VaultError {
    // =========================================================================
    // Authorization
    // =========================================================================

    /// Caller is not the vault owner
    #[msg("Unauthorized - signer does not have permission")]
    NotAuthorized,

    // =========================================================================
    // Amounts & Balances
    // =========================================================================

    /// Trying to deposit/withdraw/transfer 0 - that's not allowed
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// Redeeming or transferring more claim tokens than the caller holds
    #[msg("Insufficient claim token balance")]
    InsufficientBalance,

    /// Deposit is so small relative to the pool that it mints nothing
    #[msg("Deposit rounds to zero claim tokens")]
    ZeroSharesMinted,

    /// Compounded proceeds can only be credited while shares are outstanding
    #[msg("Vault has no outstanding claim tokens")]
    NoShareholders,

    // =========================================================================
    // Configuration & State
    // =========================================================================

    /// Withdrawal fee above the 2% cap
    #[msg("Withdrawal fee exceeds maximum allowed")]
    InvalidFeeRate,

    /// The vault has been paused by its owner
    #[msg("Vault is currently paused")]
    Paused,

    /// Pooled assets are committed to an active delegation
    #[msg("Pooled assets are locked in an active delegation")]
    AssetsLocked,

    /// New owner must be a real, different address
    #[msg("Invalid owner address")]
    InvalidOwner,

    #[msg("Token URI exceeds maximum length")]
    TokenUriTooLong,

    // =========================================================================
    // Account Validation
    // =========================================================================

    #[msg("Invalid base mint - must use the vault's base asset")]
    InvalidBaseMint,

    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,

    #[msg("Account does not belong to this vault")]
    InvalidVaultAccount,

    /// Sender and recipient positions must differ
    #[msg("Cannot transfer claim tokens to the same position")]
    SelfTransfer,

    // =========================================================================
    // Math
    // =========================================================================

    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,
}

/// Errors raised by the protocol fee ledger.
#[error_code(offset = 6100)]
pub enum FeeError {
    /// Only the configured vault may book fees; only the owner may withdraw
    #[msg("Unauthorized - caller is not the fee ledger authority")]
    NotAuthorized,

    /// Booking a zero fee or withdrawing with nothing accumulated
    #[msg("Fee amount must be greater than zero")]
    ZeroAmount,

    #[msg("Math overflow")]
    MathOverflow,
}

/// Errors raised by the delegation state machine.
#[error_code(offset = 6200)]
pub enum DelegationError {
    #[msg("Unauthorized - caller may not manage delegation")]
    NotAuthorized,

    /// `delegate` while a commitment is already active
    #[msg("Assets are already delegated")]
    AlreadyLocked,

    /// Below the minimum commitment (100,000 whole units)
    #[msg("Amount below minimum delegation")]
    InsufficientAmount,

    /// Lock duration outside 1..=12 cycles
    #[msg("Cycle count must be between 1 and 12")]
    InvalidCycleCount,

    /// Pool operator cannot change mid-commitment
    #[msg("Delegation is locked")]
    Locked,

    /// `revoke` with no active commitment
    #[msg("Assets are not delegated")]
    NotLocked,

    /// `revoke` before the unlock cycle is reached
    #[msg("Delegation has not reached its unlock cycle")]
    StillLocked,

    #[msg("Pool operator has not been set")]
    PoolOperatorNotSet,

    #[msg("Math overflow")]
    MathOverflow,
}

/// Errors raised by the harvest ledger.
#[error_code(offset = 6300)]
pub enum HarvestError {
    #[msg("Unauthorized - admin only")]
    NotAuthorized,

    #[msg("Reward amount must be greater than zero")]
    ZeroAmount,

    /// Harvest interval below the 10 height-unit floor
    #[msg("Harvest interval below minimum")]
    IntervalTooShort,

    /// Each cycle can be recorded exactly once
    #[msg("Rewards for this cycle were already recorded")]
    CycleAlreadyRecorded,

    /// Cooldown between harvest calls has not elapsed
    #[msg("Harvest interval has not elapsed")]
    TooSoon,

    #[msg("Math overflow")]
    MathOverflow,
}

/// Errors raised by the compound (reward conversion) ledger.
#[error_code(offset = 6400)]
pub enum CompoundError {
    #[msg("Unauthorized - owner only")]
    NotAuthorized,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// Slippage tolerance above the 5% cap
    #[msg("Slippage tolerance exceeds maximum")]
    SlippageExceeded,

    /// Real exchange path requested without a usable exchange
    #[msg("DEX contract not set or not integrated")]
    DexNotSet,

    /// Crediting more proceeds to the vault than were compounded
    #[msg("Amount exceeds uncredited compounded proceeds")]
    ExceedsCompounded,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,
}
