//! Financial statement builders

pub mod balance_sheet;
pub mod income_statement;
pub mod movements;
pub mod trial_balance;

pub use balance_sheet::*;
pub use income_statement::*;
pub use movements::*;
pub use trial_balance::*;
