//! Personnel aggregates: customers, staff and roles.
//!
//! # Invariants
//! - `Customer.staff_id` and `Staff.customers` are two independent
//!   relations. Writing one never updates the other.
//! - `Staff.role_id` is a scalar key; `Role.staffs` is a separate
//!   many-to-many association.

use super::{EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// A customer served by one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Must name an existing staff row when the unit of work commits.
    pub staff_id: EntityId,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        staff_id: EntityId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            phone: phone.into(),
            email: email.into(),
            staff_id,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// A staff member holding one role and serving a list of customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub user_name: String,
    /// Must name an existing role row when the unit of work commits.
    pub role_id: EntityId,
    pub customers: Vec<Customer>,
}

impl Staff {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        user_name: impl Into<String>,
        role_id: EntityId,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            phone: phone.into(),
            email: email.into(),
            user_name: user_name.into(),
            role_id,
            customers: Vec::new(),
        }
    }

    pub fn add_customer(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// A named role with the staff members assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub staffs: Vec<Staff>,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            description: description.into(),
            staffs: Vec::new(),
        }
    }

    pub fn add_staff(&mut self, staff: Staff) {
        self.staffs.push(staff);
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}
