//! Customer use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - `update_*` never creates a customer; unknown ids are `NotFound`.

use crate::listing::resolver::{FilterQueryResolver, ListingResult};
use crate::model::customer::{Customer, CustomerId};
use crate::repo::customer_repo::{CustomerRepository, RepoError, RepoResult};
use log::info;

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Use-case service wrapper for customer CRUD and listing.
pub struct CustomerService<R: CustomerRepository> {
    resolver: FilterQueryResolver<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            resolver: FilterQueryResolver::new(repo),
        }
    }

    fn repo(&self) -> &R {
        self.resolver.repository()
    }

    /// Creates a customer with a generated id and returns the stored record.
    pub fn create_customer(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> RepoResult<Customer> {
        let customer = Customer::new(first_name, last_name);
        let saved = self.repo().save(&customer)?;
        info!(
            "event=customer_create module=service status=ok id={}",
            saved.id
        );
        Ok(saved)
    }

    /// Replaces an existing customer.
    pub fn update_customer(&self, customer: &Customer) -> RepoResult<Customer> {
        if self.repo().find_by_id(customer.id)?.is_none() {
            return Err(RepoError::NotFound(customer.id));
        }
        let saved = self.repo().save(customer)?;
        info!(
            "event=customer_update module=service status=ok id={}",
            saved.id
        );
        Ok(saved)
    }

    /// Applies a partial update to an existing customer.
    pub fn patch_customer(&self, id: CustomerId, patch: &CustomerPatch) -> RepoResult<Customer> {
        let mut customer = self.repo().find_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(customer);
        }
        if let Some(first_name) = &patch.first_name {
            customer.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            customer.last_name = last_name.clone();
        }
        self.update_customer(&customer)
    }

    pub fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.repo().find_by_id(id)
    }

    pub fn delete_customer(&self, id: CustomerId) -> RepoResult<()> {
        self.repo().delete_by_id(id)?;
        info!("event=customer_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Lists customers through the filter resolver contract.
    pub fn list_customers(&self, filter: Option<&str>) -> ListingResult<Vec<Customer>> {
        self.resolver.resolve(filter)
    }
}
