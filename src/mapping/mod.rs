//! Name normalization and chart-of-accounts mapping

pub mod mapper;
pub mod normalize;

pub use mapper::*;
pub use normalize::*;
