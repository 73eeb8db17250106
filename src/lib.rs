pub mod config;
pub mod data;
pub mod error;
pub mod levels;
pub mod quote;
pub mod script;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{ErrorHandler, LevelError, LevelResult};
pub use levels::{generate_levels, LevelSet};
pub use quote::PriceSource;
