//! Repository contracts and SQLite persistence implementations.
//!
//! # Responsibility
//! - Define one `add/get/list` contract per warehouse entity.
//! - Translate between domain aggregates and table/association rows.
//!
//! # Invariants
//! - `add` stages into the session's pending batch and never commits.
//! - `add` either stages the entity with all its association rows, or
//!   nothing at all.
//! - Reads always materialize fresh values from current session state,
//!   including writes staged but not yet committed.

pub mod category_repo;
pub mod customer_repo;
pub mod error;
mod mapping;
pub mod order_repo;
pub mod product_repo;
pub mod role_repo;
pub mod staff_repo;
