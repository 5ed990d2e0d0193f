//! Account classification: prefix rule tables and the classifier

pub mod classifier;
pub mod table;

pub use classifier::*;
pub use table::*;
