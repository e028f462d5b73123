//! Customer repository contract and SQLite implementation.
//!
//! `staff_id` is stored as written. Its foreign key is deferred, so a
//! dangling value surfaces when the unit of work commits, not here.

use super::error::RepoResult;
use super::mapping::{customer_from_row, fetch_all, fetch_exactly_one, CUSTOMER_COLUMNS};
use crate::db::Session;
use crate::model::personnel::Customer;
use crate::model::EntityId;
use log::debug;
use rusqlite::params;

/// Repository interface for customers.
pub trait CustomerRepository {
    fn add(&self, customer: &Customer) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Customer>;
    fn list(&self) -> RepoResult<Vec<Customer>>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteCustomerRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn add(&self, customer: &Customer) -> RepoResult<EntityId> {
        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            conn.execute(
                "INSERT INTO customers (
                    first_name,
                    last_name,
                    address,
                    phone,
                    email,
                    staff_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    customer.first_name.as_str(),
                    customer.last_name.as_str(),
                    customer.address.as_str(),
                    customer.phone.as_str(),
                    customer.email.as_str(),
                    customer.staff_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        debug!(
            "event=repo_add module=repo entity=customer status=staged id={id} staff_id={}",
            customer.staff_id
        );
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Customer> {
        fetch_exactly_one(
            self.session.connection(),
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.id = ?1;"),
            "customer",
            id,
            customer_from_row,
        )
    }

    fn list(&self) -> RepoResult<Vec<Customer>> {
        fetch_all(
            self.session.connection(),
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customers c ORDER BY c.id ASC;"),
            [],
            customer_from_row,
        )
    }
}
