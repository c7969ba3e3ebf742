use rolodex_core::db::migrations::latest_version;
use rolodex_core::db::open_db_in_memory;
use rolodex_core::{
    seed_sample_customers, Customer, CustomerPatch, CustomerRepository, CustomerService,
    InMemoryCustomerRepository, RepoError, SqliteCustomerRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn save_and_find_by_id_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let customer = Customer::new("Chloe", "O'Brian");
    let saved = repo.save(&customer).unwrap();
    assert_eq!(saved, customer);

    let loaded = repo.find_by_id(customer.id).unwrap().unwrap();
    assert_eq!(loaded, customer);
    assert!(repo.find_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn save_of_known_id_replaces_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let mut first = Customer::new("Jack", "Bauer");
    let second = Customer::new("Kim", "Bauer");
    repo.save(&first).unwrap();
    repo.save(&second).unwrap();

    first.last_name = "Jones".to_string();
    repo.save(&first).unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all, vec![first.clone(), second]);
    assert_eq!(repo.count().unwrap(), 2);

    let by_new_name = repo
        .find_by_last_name_starts_with_ignore_case("jo")
        .unwrap();
    assert_eq!(by_new_name, vec![first]);
    assert!(repo
        .find_by_last_name_starts_with_ignore_case("bauer")
        .unwrap()
        .iter()
        .all(|customer| customer.first_name == "Kim"));
}

#[test]
fn delete_removes_and_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let customer = Customer::new("David", "Palmer");
    repo.save(&customer).unwrap();
    repo.delete_by_id(customer.id).unwrap();

    assert!(repo.find_by_id(customer.id).unwrap().is_none());
    let err = repo.delete_by_id(customer.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == customer.id));
}

#[test]
fn validation_failure_blocks_save_in_both_stores() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteCustomerRepository::try_new(&conn).unwrap();
    let memory = InMemoryCustomerRepository::new();
    let invalid = Customer::new("Mich\0elle", "Dessler");

    assert!(matches!(
        sqlite.save(&invalid).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        memory.save(&invalid).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert_eq!(sqlite.count().unwrap(), 0);
    assert_eq!(memory.count().unwrap(), 0);
}

#[test]
fn empty_names_are_stored_and_read_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let nameless = Customer::new("", "");
    repo.save(&nameless).unwrap();

    let loaded = repo.find_by_id(nameless.id).unwrap().unwrap();
    assert_eq!(loaded.first_name, "");
    assert_eq!(loaded.last_name, "");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteCustomerRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_customers_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("customers"))
    ));
}

#[test]
fn repository_rejects_connection_missing_folded_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE customers (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT ''
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "customers",
            column: "last_name_folded"
        })
    ));
}

#[test]
fn corrupt_uuid_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO customers (uuid, first_name, last_name, last_name_folded)
         VALUES ('not-a-uuid', 'Jack', 'Bauer', 'bauer');",
        [],
    )
    .unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    assert!(matches!(
        repo.find_all().unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn service_update_and_patch_require_existing_customer() {
    let service = CustomerService::new(InMemoryCustomerRepository::new());

    let created = service.create_customer("Kim", "Bauer").unwrap();
    let patched = service
        .patch_customer(
            created.id,
            &CustomerPatch {
                last_name: Some("Almeida".to_string()),
                ..CustomerPatch::default()
            },
        )
        .unwrap();
    assert_eq!(patched.first_name, "Kim");
    assert_eq!(patched.last_name, "Almeida");
    assert_eq!(service.get_customer(created.id).unwrap(), Some(patched));

    let stranger = Customer::new("Tony", "Almeida");
    assert!(matches!(
        service.update_customer(&stranger).unwrap_err(),
        RepoError::NotFound(id) if id == stranger.id
    ));
    assert!(matches!(
        service
            .patch_customer(stranger.id, &CustomerPatch::default())
            .unwrap_err(),
        RepoError::NotFound(_)
    ));

    service.delete_customer(created.id).unwrap();
    assert!(service.list_customers(None).unwrap().is_empty());
}

#[test]
fn seeding_fills_empty_store_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    assert_eq!(seed_sample_customers(&repo).unwrap(), 5);
    assert_eq!(seed_sample_customers(&repo).unwrap(), 0);

    let last_names: Vec<_> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .map(|customer| customer.last_name)
        .collect();
    assert_eq!(
        last_names,
        vec!["Bauer", "O'Brian", "Bauer", "Palmer", "Dessler"]
    );
}
