//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - `category_products` rows are written only for products the session
//!   can already see.
//! - Listing returns fully rebuilt `Category` values, each with its
//!   linked products.

use super::error::RepoResult;
use super::mapping::{
    ensure_referenced, fetch_all, fetch_exactly_one, insert_links, load_linked_products,
};
use crate::db::Session;
use crate::model::catalog::Category;
use crate::model::EntityId;
use log::debug;
use rusqlite::{params, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, description FROM categories";

/// Repository interface for categories and their product links.
pub trait CategoryRepository {
    /// Stages a category plus one association row per nested product.
    fn add(&self, category: &Category) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Category>;
    fn list(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteCategoryRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn add(&self, category: &Category) -> RepoResult<EntityId> {
        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            for product in &category.products {
                ensure_referenced(conn, "products", "product", product.id)?;
            }

            conn.execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2);",
                params![category.name.as_str(), category.description.as_str()],
            )?;
            let id = conn.last_insert_rowid();
            insert_links(
                conn,
                "INSERT INTO category_products (category_id, product_id) VALUES (?1, ?2);",
                id,
                category.products.iter().map(|product| product.id),
            )?;
            Ok(id)
        })?;

        debug!(
            "event=repo_add module=repo entity=category status=staged id={id} products={}",
            category.products.len()
        );
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Category> {
        let conn = self.session.connection();
        let category = fetch_exactly_one(
            conn,
            &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
            "category",
            id,
            category_from_row,
        )?;
        with_products(conn, category)
    }

    fn list(&self) -> RepoResult<Vec<Category>> {
        let conn = self.session.connection();
        fetch_all(
            conn,
            &format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"),
            [],
            category_from_row,
        )?
        .into_iter()
        .map(|category| with_products(conn, category))
        .collect()
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        products: Vec::new(),
    })
}

fn with_products(conn: &Connection, mut category: Category) -> RepoResult<Category> {
    category.products =
        load_linked_products(conn, "category_products", "category_id", category.id)?;
    Ok(category)
}
