// =============================================================================
// Instructions Module
// =============================================================================
// One module per group of instructions. Account-validation structs live next
// to their handlers.
// =============================================================================

// Vault
pub mod admin;
pub mod deposit;
pub mod initialize_vault;
pub mod transfer_claims;
pub mod withdraw;

// Ledgers
pub mod compound;
pub mod harvest;
pub mod manage_delegation;

// Read-only queries
pub mod views;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use compound::*;
pub use deposit::*;
pub use harvest::*;
pub use initialize_vault::*;
pub use manage_delegation::*;
pub use transfer_claims::*;
pub use views::*;
pub use withdraw::*;
