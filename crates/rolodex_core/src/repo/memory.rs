//! In-process customer store.
//!
//! # Responsibility
//! - Provide a `CustomerRepository` without SQLite, shareable across threads.
//!
//! # Invariants
//! - Records keep insertion order; `save` of a known id replaces in place.
//! - While switched offline every operation fails with
//!   `RepoError::Unavailable` and stored records are left untouched.
//! - A poisoned lock is reported as `RepoError::Unavailable`, never as data.

use crate::model::customer::{fold_case, Customer, CustomerId};
use crate::repo::customer_repo::{CustomerRepository, RepoError, RepoResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// `RwLock`-guarded customer list with an availability switch.
#[derive(Debug)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
    available: AtomicBool,
}

impl Default for InMemoryCustomerRepository {
    fn default() -> Self {
        Self::from_customers(Vec::new())
    }
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_customers(customers: Vec<Customer>) -> Self {
        Self {
            customers: RwLock::new(customers),
            available: AtomicBool::new(true),
        }
    }

    /// Takes the store offline (`false`) or brings it back (`true`).
    ///
    /// Offline, every repository call fails with `RepoError::Unavailable`,
    /// the way a remote store behaves when its connection drops.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RepoError::Unavailable("in-memory store is offline".to_string()))
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<Customer>>> {
        self.ensure_available()?;
        self.customers
            .read()
            .map_err(|_| RepoError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<Customer>>> {
        self.ensure_available()?;
        self.customers
            .write()
            .map_err(|_| RepoError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl FromIterator<Customer> for InMemoryCustomerRepository {
    fn from_iter<T: IntoIterator<Item = Customer>>(iter: T) -> Self {
        Self::from_customers(iter.into_iter().collect())
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        Ok(self.read()?.clone())
    }

    fn find_by_last_name_starts_with_ignore_case(
        &self,
        prefix: &str,
    ) -> RepoResult<Vec<Customer>> {
        let folded = fold_case(prefix);
        Ok(self
            .read()?
            .iter()
            .filter(|customer| customer.folded_last_name().starts_with(&folded))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        Ok(self
            .read()?
            .iter()
            .find(|customer| customer.id == id)
            .cloned())
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        self.ensure_available()?;
        customer.validate()?;

        let mut customers = self.write()?;
        match customers.iter_mut().find(|stored| stored.id == customer.id) {
            Some(stored) => *stored = customer.clone(),
            None => customers.push(customer.clone()),
        }
        Ok(customer.clone())
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        let mut customers = self.write()?;
        let position = customers
            .iter()
            .position(|customer| customer.id == id)
            .ok_or(RepoError::NotFound(id))?;
        customers.remove(position);
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        Ok(self.read()?.len() as u64)
    }
}
