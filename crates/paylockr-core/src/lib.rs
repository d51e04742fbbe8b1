//! # paylockr-core
//!
//! Core crate for PayLockr. Contains configuration schemas, typed
//! identifiers, currency and plan-tier domain types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other PayLockr crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
