//! Core use-case services.
//!
//! # Responsibility
//! - Build domain aggregates from caller input and hand them to repositories.
//! - Keep callers decoupled from storage details.

pub mod warehouse_service;
