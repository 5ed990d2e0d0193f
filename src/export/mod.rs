//! Export targets: plain-text ledger files and CSV tables

pub mod tables;
pub mod text_ledger;

pub use tables::*;
pub use text_ledger::*;
