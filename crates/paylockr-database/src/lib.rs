//! # paylockr-database
//!
//! Persistence layer for PayLockr. Defines the store traits the services
//! depend on, the PostgreSQL repositories implementing them, and an
//! in-memory backend for single-node development and tests.
//!
//! The correctness-critical guarantees of the redemption pipeline (the
//! unique external reference, the conditional quota increment and status
//! transitions) are enforced here atomically, never by read-then-write
//! in the services.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use stores::{FileStore, GrantStore, LinkStore, SellerStore, Stores, TransactionStore};
