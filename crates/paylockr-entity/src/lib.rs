//! # paylockr-entity
//!
//! Domain entity models for PayLockr. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod file;
pub mod grant;
pub mod link;
pub mod seller;
pub mod transaction;

pub use file::File;
pub use grant::DownloadGrant;
pub use link::PaymentLink;
pub use seller::Seller;
pub use transaction::{NewTransaction, Transaction, TransactionStatus};
