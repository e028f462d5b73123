//! Warehouse domain model.
//!
//! # Responsibility
//! - Define plain data records for catalog (product, category, order) and
//!   personnel (customer, staff, role) aggregates.
//! - Express many-to-many associations as embedded collections.
//!
//! # Invariants
//! - Every entity is identified by a storage-assigned [`EntityId`].
//! - [`UNASSIGNED_ID`] marks an entity that has not been persisted yet.
//! - Entities carry no reference to the repository that produced them.

pub mod catalog;
pub mod personnel;

/// Storage-assigned primary key.
pub type EntityId = i64;

/// Identifier of an entity that storage has not assigned yet.
pub const UNASSIGNED_ID: EntityId = 0;
