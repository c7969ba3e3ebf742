//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract consumed by listing and editing.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Customer::validate()` before persistence.
//! - Listing reads return records in insertion order.

pub mod customer_repo;
pub mod memory;
