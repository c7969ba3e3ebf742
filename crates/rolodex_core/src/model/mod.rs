//! Domain model for the customer directory.
//!
//! # Invariants
//! - Every customer is identified by a stable `CustomerId`.
//! - Deletion is a hard delete; there are no tombstones or cascades.

pub mod customer;
