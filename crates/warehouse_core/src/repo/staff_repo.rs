//! Staff repository contract and SQLite implementation.
//!
//! # Invariants
//! - `staff_customers` links only customers visible to the session.
//! - Nested customers keep their own raw `staff_id`; linking a customer to
//!   a staff member never rewrites it.

use super::error::RepoResult;
use super::mapping::{
    ensure_referenced, fetch_all, fetch_exactly_one, insert_links, load_linked_customers,
    staff_from_row, STAFF_COLUMNS,
};
use crate::db::Session;
use crate::model::personnel::Staff;
use crate::model::EntityId;
use log::debug;
use rusqlite::{params, Connection};

/// Repository interface for staff members and their customer links.
pub trait StaffRepository {
    fn add(&self, staff: &Staff) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Staff>;
    fn list(&self) -> RepoResult<Vec<Staff>>;
}

/// SQLite-backed staff repository.
pub struct SqliteStaffRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteStaffRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl StaffRepository for SqliteStaffRepository<'_> {
    fn add(&self, staff: &Staff) -> RepoResult<EntityId> {
        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            for customer in &staff.customers {
                ensure_referenced(conn, "customers", "customer", customer.id)?;
            }

            conn.execute(
                "INSERT INTO staff (
                    first_name,
                    last_name,
                    address,
                    phone,
                    email,
                    user_name,
                    role_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    staff.first_name.as_str(),
                    staff.last_name.as_str(),
                    staff.address.as_str(),
                    staff.phone.as_str(),
                    staff.email.as_str(),
                    staff.user_name.as_str(),
                    staff.role_id,
                ],
            )?;
            let id = conn.last_insert_rowid();
            insert_links(
                conn,
                "INSERT INTO staff_customers (staff_id, customer_id) VALUES (?1, ?2);",
                id,
                staff.customers.iter().map(|customer| customer.id),
            )?;
            Ok(id)
        })?;

        debug!(
            "event=repo_add module=repo entity=staff status=staged id={id} role_id={} customers={}",
            staff.role_id,
            staff.customers.len()
        );
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Staff> {
        let conn = self.session.connection();
        let staff = fetch_exactly_one(
            conn,
            &format!("SELECT {STAFF_COLUMNS} FROM staff s WHERE s.id = ?1;"),
            "staff",
            id,
            staff_from_row,
        )?;
        with_customers(conn, staff)
    }

    fn list(&self) -> RepoResult<Vec<Staff>> {
        let conn = self.session.connection();
        fetch_all(
            conn,
            &format!("SELECT {STAFF_COLUMNS} FROM staff s ORDER BY s.id ASC;"),
            [],
            staff_from_row,
        )?
        .into_iter()
        .map(|staff| with_customers(conn, staff))
        .collect()
    }
}

fn with_customers(conn: &Connection, mut staff: Staff) -> RepoResult<Staff> {
    staff.customers = load_linked_customers(conn, staff.id)?;
    Ok(staff)
}
