//! Filtered customer listing.
//!
//! # Responsibility
//! - Resolve a filter fragment into the matching customers.
//! - Push result sets to a presenter after each query.
//! - Collapse keystroke bursts into one query per settled value.
//!
//! # Invariants
//! - The resolver holds no mutable state and never retries.
//! - A failed query leaves the presenter showing its previous result set.

pub mod debounce;
pub mod resolver;
pub mod view;
