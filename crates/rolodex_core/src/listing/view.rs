//! Listing presenter seam and the view that drives it.

use crate::listing::resolver::{FilterQueryResolver, ListingResult};
use crate::model::customer::Customer;
use crate::repo::customer_repo::CustomerRepository;

/// Receives the latest result set after every successful query.
pub trait ListingPresenter {
    fn refresh(&mut self, customers: &[Customer]);
}

impl<F: FnMut(&[Customer])> ListingPresenter for F {
    fn refresh(&mut self, customers: &[Customer]) {
        self(customers)
    }
}

/// Presenter that keeps the last result set, e.g. for a terminal table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectingPresenter {
    pub customers: Vec<Customer>,
    pub refresh_count: usize,
}

impl ListingPresenter for CollectingPresenter {
    fn refresh(&mut self, customers: &[Customer]) {
        self.customers = customers.to_vec();
        self.refresh_count += 1;
    }
}

/// Binds a resolver, a presenter and the current filter text.
pub struct ListingView<R, P> {
    resolver: FilterQueryResolver<R>,
    presenter: P,
    filter: String,
}

impl<R: CustomerRepository, P: ListingPresenter> ListingView<R, P> {
    pub fn new(resolver: FilterQueryResolver<R>, presenter: P) -> Self {
        Self {
            resolver,
            presenter,
            filter: String::new(),
        }
    }

    /// Current filter text; empty means unfiltered.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn resolver(&self) -> &FilterQueryResolver<R> {
        &self.resolver
    }

    /// Replaces the filter text, re-queries and refreshes the presenter.
    ///
    /// The new filter is kept even when the query fails, so a later
    /// [`reload`](Self::reload) retries it.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> ListingResult<usize> {
        self.filter = filter.into();
        self.reload()
    }

    /// Re-runs the current filter and refreshes the presenter.
    ///
    /// Returns the number of customers shown. On failure the presenter is
    /// left untouched.
    pub fn reload(&mut self) -> ListingResult<usize> {
        let customers = self.resolver.resolve(Some(self.filter.as_str()))?;
        self.presenter.refresh(&customers);
        Ok(customers.len())
    }
}
