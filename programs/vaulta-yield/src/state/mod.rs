// =============================================================================
// State Module
// =============================================================================
// Account structures for the vault and its four ledgers. Every state
// transition is a plain method on these structs taking the caller and the
// current height explicitly; instruction handlers only load accounts, call
// the method, move tokens and log.
// =============================================================================

pub mod compound_ledger;
pub mod delegation;
pub mod fee_ledger;
pub mod harvest_ledger;
pub mod position;
pub mod vault;

pub use compound_ledger::*;
pub use delegation::*;
pub use fee_ledger::*;
pub use harvest_ledger::*;
pub use position::*;
pub use vault::*;
