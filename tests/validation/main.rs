//! Validation Engine Integration Tests
//!
//! Single, bulk, cart and order checks, stock info, and notifications.

#[path = "../common/mod.rs"]
mod common;

mod bulk;
mod info;
mod single;
