//! Sample customers for empty stores.

use crate::model::customer::Customer;
use crate::repo::customer_repo::{CustomerRepository, RepoResult};
use log::info;

/// First/last name pairs inserted by [`seed_sample_customers`], in order.
pub const SAMPLE_CUSTOMERS: &[(&str, &str)] = &[
    ("Jack", "Bauer"),
    ("Chloe", "O'Brian"),
    ("Kim", "Bauer"),
    ("David", "Palmer"),
    ("Michelle", "Dessler"),
];

/// Inserts [`SAMPLE_CUSTOMERS`] when the store is empty.
///
/// Returns the number of inserted customers; `0` when the store already
/// holds data.
pub fn seed_sample_customers<R: CustomerRepository>(repo: &R) -> RepoResult<usize> {
    if repo.count()? > 0 {
        info!("event=seed module=seed status=skipped reason=store_not_empty");
        return Ok(0);
    }

    for (first_name, last_name) in SAMPLE_CUSTOMERS {
        repo.save(&Customer::new(*first_name, *last_name))?;
    }

    info!(
        "event=seed module=seed status=ok inserted={}",
        SAMPLE_CUSTOMERS.len()
    );
    Ok(SAMPLE_CUSTOMERS.len())
}
