//! PostgreSQL repository implementations of the store traits.

pub mod file;
pub mod grant;
pub mod link;
pub mod seller;
pub mod transaction;
