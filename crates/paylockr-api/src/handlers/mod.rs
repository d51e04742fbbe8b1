//! HTTP request handlers, one module per resource.

pub mod download;
pub mod health;
pub mod link;
pub mod payment;
pub mod webhook;
