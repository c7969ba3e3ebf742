//! Customer directory core: record store, filtered listing and editing.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod listing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, RolodexConfig};
pub use listing::debounce::FilterDebouncer;
pub use listing::resolver::{FilterQueryResolver, ListingError, ListingResult};
pub use listing::view::{CollectingPresenter, ListingPresenter, ListingView};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::{Customer, CustomerId, CustomerValidationError};
pub use repo::customer_repo::{CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository};
pub use repo::memory::InMemoryCustomerRepository;
pub use seed::seed_sample_customers;
pub use service::customer_service::{CustomerPatch, CustomerService};
pub use service::editor::{CustomerEditor, EditorChange, EditorError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
