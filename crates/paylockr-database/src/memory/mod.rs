//! In-memory store backend for single-node development and tests.

mod store;

pub use store::MemoryStores;
