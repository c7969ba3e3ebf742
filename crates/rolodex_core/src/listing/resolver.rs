//! Filter query resolver.
//!
//! # Invariants
//! - Absent or empty fragment lists every customer.
//! - Non-empty fragments match last names by case-insensitive prefix.
//! - Store order is preserved; no match is an empty list, not an error.
//! - Store failures surface as `ListingError::StoreUnavailable` unchanged.

use crate::model::customer::Customer;
use crate::repo::customer_repo::{CustomerRepository, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ListingResult<T> = Result<T, ListingError>;

/// Failure of a listing query.
#[derive(Debug)]
pub enum ListingError {
    /// The record store could not serve the query.
    StoreUnavailable(RepoError),
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "customer listing unavailable: {err}"),
        }
    }
}

impl Error for ListingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
        }
    }
}

impl From<RepoError> for ListingError {
    fn from(value: RepoError) -> Self {
        Self::StoreUnavailable(value)
    }
}

/// Resolves filter fragments against a customer store.
#[derive(Debug, Clone)]
pub struct FilterQueryResolver<R> {
    repo: R,
}

impl<R: CustomerRepository> FilterQueryResolver<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the underlying store.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists customers whose last name starts with `fragment`, ignoring case.
    ///
    /// `None` and `Some("")` list every customer. Whitespace is part of the
    /// fragment and is not trimmed.
    ///
    /// # Errors
    /// - `ListingError::StoreUnavailable` when the store fails.
    pub fn resolve(&self, fragment: Option<&str>) -> ListingResult<Vec<Customer>> {
        let started_at = Instant::now();
        let fragment = fragment.filter(|text| !text.is_empty());

        let result = match fragment {
            None => self.repo.find_all(),
            Some(text) => self.repo.find_by_last_name_starts_with_ignore_case(text),
        };

        // Filter text is user input: only its length is logged.
        let fragment_chars = fragment.map_or(0, |text| text.chars().count());
        match result {
            Ok(customers) => {
                debug!(
                    "event=listing_resolve module=listing status=ok filtered={} fragment_chars={} count={} duration_ms={}",
                    fragment.is_some(),
                    fragment_chars,
                    customers.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(customers)
            }
            Err(err) => {
                warn!(
                    "event=listing_resolve module=listing status=error filtered={} fragment_chars={} unavailable={} error={}",
                    fragment.is_some(),
                    fragment_chars,
                    err.is_unavailable(),
                    err
                );
                Err(ListingError::StoreUnavailable(err))
            }
        }
    }
}
