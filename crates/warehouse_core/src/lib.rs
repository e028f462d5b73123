//! Core persistence boundary for the warehouse domain.
//! Domain aggregates, repository contracts, SQLite mappings and the unit of
//! work that decides when staged writes become durable.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod uow;

pub use config::{ConfigError, StorageTarget, WarehouseConfig};
pub use db::{open_session, open_session_in_memory, open_session_with, DbError, Session};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::catalog::{Category, Order, Product};
pub use model::personnel::{Customer, Role, Staff};
pub use model::{EntityId, UNASSIGNED_ID};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::order_repo::{OrderRepository, SqliteOrderRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::role_repo::{RoleRepository, SqliteRoleRepository};
pub use repo::staff_repo::{SqliteStaffRepository, StaffRepository};
pub use service::warehouse_service::{
    NewCustomerRequest, NewStaffRequest, ServiceError, ServiceResult, WarehouseService,
};
pub use uow::{with_unit_of_work, SqliteUnitOfWork, UnitOfWork, UnitOfWorkState};

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
