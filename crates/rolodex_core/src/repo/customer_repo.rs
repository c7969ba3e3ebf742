//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus case-insensitive last-name prefix lookup.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Customer::validate()` before SQL mutations.
//! - `last_name_folded` always mirrors `fold_case(last_name)`.
//! - Reads order by `seq`, the insertion sequence; replacing a customer keeps
//!   its original position.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::customer::{fold_case, Customer, CustomerId, CustomerValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

const CUSTOMER_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name
FROM customers";

const REQUIRED_COLUMNS: &[&str] = &[
    "seq",
    "uuid",
    "first_name",
    "last_name",
    "last_name_folded",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for customer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CustomerValidationError),
    Db(DbError),
    NotFound(CustomerId),
    InvalidData(String),
    /// Backing store cannot be reached at all.
    Unavailable(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether the failure means the store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Db(err) => err.is_unavailable(),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "customer not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted customer data: {message}"),
            Self::Unavailable(message) => write!(f, "customer store unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CustomerValidationError> for RepoError {
    fn from(value: CustomerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store contract for customers.
///
/// Every listing method returns customers in insertion order.
pub trait CustomerRepository {
    /// Returns every stored customer.
    fn find_all(&self) -> RepoResult<Vec<Customer>>;
    /// Returns customers whose last name starts with `prefix`, ignoring case.
    fn find_by_last_name_starts_with_ignore_case(&self, prefix: &str)
        -> RepoResult<Vec<Customer>>;
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Inserts a new customer or replaces the stored one with the same id.
    fn save(&self, customer: &Customer) -> RepoResult<Customer>;
    /// Removes a customer; unknown ids yield `RepoError::NotFound`.
    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

impl<R: CustomerRepository + ?Sized> CustomerRepository for &R {
    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        (**self).find_all()
    }

    fn find_by_last_name_starts_with_ignore_case(
        &self,
        prefix: &str,
    ) -> RepoResult<Vec<Customer>> {
        (**self).find_by_last_name_starts_with_ignore_case(prefix)
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        (**self).find_by_id(id)
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        (**self).save(customer)
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }

    fn count(&self) -> RepoResult<u64> {
        (**self).count()
    }
}

impl<R: CustomerRepository + ?Sized> CustomerRepository for Arc<R> {
    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        (**self).find_all()
    }

    fn find_by_last_name_starts_with_ignore_case(
        &self,
        prefix: &str,
    ) -> RepoResult<Vec<Customer>> {
        (**self).find_by_last_name_starts_with_ignore_case(prefix)
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        (**self).find_by_id(id)
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        (**self).save(customer)
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }

    fn count(&self) -> RepoResult<u64> {
        (**self).count()
    }
}

/// SQLite-backed customer repository.
#[derive(Clone, Copy)]
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Wraps a connection that has already been migrated.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not the
    ///   latest migration (the connection did not come from `db::open_db`).
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_customers(&mut rows)
    }

    fn find_by_last_name_starts_with_ignore_case(
        &self,
        prefix: &str,
    ) -> RepoResult<Vec<Customer>> {
        let folded = fold_case(prefix);
        // substr counts characters for TEXT values, so no LIKE escaping is needed.
        let prefix_chars = i64::try_from(folded.chars().count()).map_err(|_| {
            RepoError::InvalidData("prefix length does not fit in i64".to_string())
        })?;

        let mut stmt = self.conn.prepare(&format!(
            "{CUSTOMER_SELECT_SQL}
             WHERE substr(last_name_folded, 1, ?2) = ?1
             ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query(params![folded, prefix_chars])?;
        collect_customers(&mut rows)
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_customer_row(row)?)),
            None => Ok(None),
        }
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        customer.validate()?;

        self.conn.execute(
            "INSERT INTO customers (
                uuid,
                first_name,
                last_name,
                last_name_folded
            ) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(uuid) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                last_name_folded = excluded.last_name_folded,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                customer.id.to_string(),
                customer.first_name.as_str(),
                customer.last_name.as_str(),
                customer.folded_last_name(),
            ],
        )?;

        Ok(customer.clone())
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative customer count {count}")))
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'customers';",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("customers"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('customers');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "customers",
                column,
            });
        }
    }

    Ok(())
}

fn collect_customers(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<Customer>> {
    let mut customers = Vec::new();
    while let Some(row) = rows.next()? {
        customers.push(parse_customer_row(row)?);
    }
    Ok(customers)
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in customers.uuid"))
    })?;

    let first_name: Option<String> = row.get("first_name")?;
    let last_name: Option<String> = row.get("last_name")?;

    Ok(Customer::with_id(
        id,
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default(),
    ))
}
