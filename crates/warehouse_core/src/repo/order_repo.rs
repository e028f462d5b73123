//! Order repository contract and SQLite implementation.
//!
//! An order row carries no columns besides its id; everything else lives
//! in `order_products`.

use super::error::RepoResult;
use super::mapping::{
    ensure_referenced, fetch_all, fetch_exactly_one, insert_links, load_linked_products,
};
use crate::db::Session;
use crate::model::catalog::Order;
use crate::model::EntityId;
use log::debug;
use rusqlite::{Connection, Row};

/// Repository interface for orders.
pub trait OrderRepository {
    /// Stages an order; every nested product must already have an id.
    fn add(&self, order: &Order) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Order>;
    fn list(&self) -> RepoResult<Vec<Order>>;
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteOrderRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn add(&self, order: &Order) -> RepoResult<EntityId> {
        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            for product in &order.products {
                ensure_referenced(conn, "products", "product", product.id)?;
            }

            conn.execute("INSERT INTO orders DEFAULT VALUES;", [])?;
            let id = conn.last_insert_rowid();
            insert_links(
                conn,
                "INSERT INTO order_products (order_id, product_id) VALUES (?1, ?2);",
                id,
                order.products.iter().map(|product| product.id),
            )?;
            Ok(id)
        })?;

        debug!(
            "event=repo_add module=repo entity=order status=staged id={id} products={}",
            order.products.len()
        );
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Order> {
        let conn = self.session.connection();
        let order = fetch_exactly_one(
            conn,
            "SELECT id FROM orders WHERE id = ?1;",
            "order",
            id,
            order_from_row,
        )?;
        with_products(conn, order)
    }

    fn list(&self) -> RepoResult<Vec<Order>> {
        let conn = self.session.connection();
        fetch_all(conn, "SELECT id FROM orders ORDER BY id ASC;", [], order_from_row)?
            .into_iter()
            .map(|order| with_products(conn, order))
            .collect()
    }
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get("id")?,
        products: Vec::new(),
    })
}

fn with_products(conn: &Connection, mut order: Order) -> RepoResult<Order> {
    order.products = load_linked_products(conn, "order_products", "order_id", order.id)?;
    Ok(order)
}
