//! Row mapping and association traversal shared by SQLite repositories.
//!
//! # Invariants
//! - Nested collections are loaded one hop deep: mapped entities carry
//!   scalar fields only and their own collections stay empty.
//! - Association rows are read in insertion order (`rowid`).

use super::error::{RepoError, RepoResult};
use crate::model::catalog::Product;
use crate::model::personnel::{Customer, Staff};
use crate::model::EntityId;
use rusqlite::{params, Connection, Params, Row};

pub(crate) const PRODUCT_COLUMNS: &str = "p.id AS id,
    p.name AS name,
    p.quantity AS quantity,
    p.price AS price,
    p.category AS category";

pub(crate) const CUSTOMER_COLUMNS: &str = "c.id AS id,
    c.first_name AS first_name,
    c.last_name AS last_name,
    c.address AS address,
    c.phone AS phone,
    c.email AS email,
    c.staff_id AS staff_id";

pub(crate) const STAFF_COLUMNS: &str = "s.id AS id,
    s.first_name AS first_name,
    s.last_name AS last_name,
    s.address AS address,
    s.phone AS phone,
    s.email AS email,
    s.user_name AS user_name,
    s.role_id AS role_id";

pub(crate) fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        price: row.get("price")?,
        category: row.get("category")?,
    })
}

pub(crate) fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        staff_id: row.get("staff_id")?,
    })
}

/// Maps staff scalar columns; `customers` is left empty.
pub(crate) fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        user_name: row.get("user_name")?,
        role_id: row.get("role_id")?,
        customers: Vec::new(),
    })
}

/// Runs a query expected to match exactly one row.
///
/// Zero or several matches are both reported as `NotFound`.
pub(crate) fn fetch_exactly_one<T>(
    conn: &Connection,
    sql: &str,
    entity: &'static str,
    id: EntityId,
    map: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<T> {
    let mut matches = fetch_all(conn, sql, params![id], map)?;
    if matches.len() != 1 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(matches.remove(0))
}

pub(crate) fn fetch_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(map(row)?);
    }
    Ok(values)
}

/// Fails with `ReferencedEntityNotFound` unless `table` holds a row with `id`.
///
/// Sees rows staged earlier in the same session, committed or not.
pub(crate) fn ensure_referenced(
    conn: &Connection,
    table: &'static str,
    entity: &'static str,
    id: EntityId,
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::ReferencedEntityNotFound { entity, id });
    }
    Ok(())
}

/// Inserts one association row per member id, in list order.
pub(crate) fn insert_links(
    conn: &Connection,
    insert_sql: &str,
    owner_id: EntityId,
    member_ids: impl IntoIterator<Item = EntityId>,
) -> RepoResult<()> {
    let mut stmt = conn.prepare(insert_sql)?;
    for member_id in member_ids {
        stmt.execute(params![owner_id, member_id])?;
    }
    Ok(())
}

pub(crate) fn load_linked_products(
    conn: &Connection,
    link_table: &'static str,
    owner_column: &'static str,
    owner_id: EntityId,
) -> RepoResult<Vec<Product>> {
    fetch_all(
        conn,
        &format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM {link_table} link
             INNER JOIN products p ON p.id = link.product_id
             WHERE link.{owner_column} = ?1
             ORDER BY link.rowid ASC;"
        ),
        params![owner_id],
        product_from_row,
    )
}

pub(crate) fn load_linked_customers(
    conn: &Connection,
    staff_id: EntityId,
) -> RepoResult<Vec<Customer>> {
    fetch_all(
        conn,
        &format!(
            "SELECT {CUSTOMER_COLUMNS}
             FROM staff_customers link
             INNER JOIN customers c ON c.id = link.customer_id
             WHERE link.staff_id = ?1
             ORDER BY link.rowid ASC;"
        ),
        params![staff_id],
        customer_from_row,
    )
}

pub(crate) fn load_linked_staff(conn: &Connection, role_id: EntityId) -> RepoResult<Vec<Staff>> {
    fetch_all(
        conn,
        &format!(
            "SELECT {STAFF_COLUMNS}
             FROM role_staff link
             INNER JOIN staff s ON s.id = link.staff_id
             WHERE link.role_id = ?1
             ORDER BY link.rowid ASC;"
        ),
        params![role_id],
        staff_from_row,
    )
}
