//! Command implementations

pub mod discover;
pub mod tables;
pub mod validate;

#[cfg(feature = "serve")]
pub mod serve;
