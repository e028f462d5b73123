//! Product repository contract and SQLite implementation.

use super::error::{RepoError, RepoResult};
use super::mapping::{fetch_all, fetch_exactly_one, product_from_row, PRODUCT_COLUMNS};
use crate::db::Session;
use crate::model::catalog::Product;
use crate::model::EntityId;
use log::debug;
use rusqlite::params;

/// Repository interface for products.
pub trait ProductRepository {
    /// Stages a product and returns the id storage assigned to it.
    ///
    /// A NaN or infinite price is `InvalidData` and stages nothing.
    fn add(&self, product: &Product) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Product>;
    fn list(&self) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteProductRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn add(&self, product: &Product) -> RepoResult<EntityId> {
        if !product.price.is_finite() {
            return Err(RepoError::InvalidData(format!(
                "product price must be finite, got {}",
                product.price
            )));
        }

        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            conn.execute(
                "INSERT INTO products (name, quantity, price, category)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    product.name.as_str(),
                    product.quantity,
                    product.price,
                    product.category,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        debug!("event=repo_add module=repo entity=product status=staged id={id}");
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Product> {
        fetch_exactly_one(
            self.session.connection(),
            &format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ?1;"),
            "product",
            id,
            product_from_row,
        )
    }

    fn list(&self) -> RepoResult<Vec<Product>> {
        fetch_all(
            self.session.connection(),
            &format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.id ASC;"),
            [],
            product_from_row,
        )
    }
}
