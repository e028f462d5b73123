//! Warehouse use-case service.
//!
//! # Responsibility
//! - Provide create/get/list entry points for every warehouse entity.
//! - Delegate persistence to whichever repositories were supplied.
//!
//! # Invariants
//! - Every repository is optional. Without one, `create_*` still returns
//!   the constructed entity (id 0) and has no storage side effect.
//! - Reads through a missing repository fail with `RepositoryUnavailable`.
//! - The service never commits; transaction scope belongs to the caller's
//!   unit of work.

use crate::model::catalog::{Category, Order, Product};
use crate::model::personnel::{Customer, Role, Staff};
use crate::model::EntityId;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::error::RepoError;
use crate::repo::order_repo::OrderRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::role_repo::RoleRepository;
use crate::repo::staff_repo::StaffRepository;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from warehouse service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// A read was requested through a repository the service was not given.
    RepositoryUnavailable(&'static str),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RepositoryUnavailable(entity) => {
                write!(f, "no {entity} repository configured")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RepositoryUnavailable(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub staff_id: EntityId,
}

/// Request model for creating a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub user_name: String,
    pub role_id: EntityId,
    /// Already-persisted customers to link.
    pub customers: Vec<Customer>,
}

/// Use-case facade over optional warehouse repositories.
#[derive(Default)]
pub struct WarehouseService<'r> {
    products: Option<&'r dyn ProductRepository>,
    orders: Option<&'r dyn OrderRepository>,
    categories: Option<&'r dyn CategoryRepository>,
    roles: Option<&'r dyn RoleRepository>,
    staff: Option<&'r dyn StaffRepository>,
    customers: Option<&'r dyn CustomerRepository>,
}

impl<'r> WarehouseService<'r> {
    /// Creates a service with no repositories attached.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product_repo(mut self, repo: &'r dyn ProductRepository) -> Self {
        self.products = Some(repo);
        self
    }

    pub fn with_order_repo(mut self, repo: &'r dyn OrderRepository) -> Self {
        self.orders = Some(repo);
        self
    }

    pub fn with_category_repo(mut self, repo: &'r dyn CategoryRepository) -> Self {
        self.categories = Some(repo);
        self
    }

    pub fn with_role_repo(mut self, repo: &'r dyn RoleRepository) -> Self {
        self.roles = Some(repo);
        self
    }

    pub fn with_staff_repo(mut self, repo: &'r dyn StaffRepository) -> Self {
        self.staff = Some(repo);
        self
    }

    pub fn with_customer_repo(mut self, repo: &'r dyn CustomerRepository) -> Self {
        self.customers = Some(repo);
        self
    }

    /// Creates a product and stages it when a product repository is attached.
    ///
    /// The returned product carries the staged id, or 0 when nothing was staged.
    pub fn create_product(
        &self,
        name: impl Into<String>,
        quantity: u32,
        price: f64,
        category: i64,
    ) -> ServiceResult<Product> {
        let mut product = Product::new(name, quantity, price, category);
        if let Some(repo) = self.products {
            product.id = repo.add(&product)?;
        }
        Ok(product)
    }

    pub fn create_order(&self, products: Vec<Product>) -> ServiceResult<Order> {
        let mut order = Order::with_products(products);
        if let Some(repo) = self.orders {
            order.id = repo.add(&order)?;
        }
        Ok(order)
    }

    pub fn create_category(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        products: Vec<Product>,
    ) -> ServiceResult<Category> {
        let mut category = Category::new(name, description);
        category.products = products;
        if let Some(repo) = self.categories {
            category.id = repo.add(&category)?;
        }
        Ok(category)
    }

    pub fn create_role(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        staffs: Vec<Staff>,
    ) -> ServiceResult<Role> {
        let mut role = Role::new(name, description);
        role.staffs = staffs;
        if let Some(repo) = self.roles {
            role.id = repo.add(&role)?;
        }
        Ok(role)
    }

    pub fn create_staff(&self, request: NewStaffRequest) -> ServiceResult<Staff> {
        let mut staff = Staff::new(
            request.first_name,
            request.last_name,
            request.address,
            request.phone,
            request.email,
            request.user_name,
            request.role_id,
        );
        staff.customers = request.customers;
        if let Some(repo) = self.staff {
            staff.id = repo.add(&staff)?;
        }
        Ok(staff)
    }

    pub fn create_customer(&self, request: NewCustomerRequest) -> ServiceResult<Customer> {
        let mut customer = Customer::new(
            request.first_name,
            request.last_name,
            request.address,
            request.phone,
            request.email,
            request.staff_id,
        );
        if let Some(repo) = self.customers {
            customer.id = repo.add(&customer)?;
        }
        Ok(customer)
    }

    pub fn get_product(&self, id: EntityId) -> ServiceResult<Product> {
        Ok(required(self.products, "product")?.get(id)?)
    }

    pub fn get_order(&self, id: EntityId) -> ServiceResult<Order> {
        Ok(required(self.orders, "order")?.get(id)?)
    }

    pub fn get_category(&self, id: EntityId) -> ServiceResult<Category> {
        Ok(required(self.categories, "category")?.get(id)?)
    }

    pub fn get_role(&self, id: EntityId) -> ServiceResult<Role> {
        Ok(required(self.roles, "role")?.get(id)?)
    }

    pub fn get_staff(&self, id: EntityId) -> ServiceResult<Staff> {
        Ok(required(self.staff, "staff")?.get(id)?)
    }

    pub fn get_customer(&self, id: EntityId) -> ServiceResult<Customer> {
        Ok(required(self.customers, "customer")?.get(id)?)
    }

    pub fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(required(self.products, "product")?.list()?)
    }

    pub fn list_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(required(self.orders, "order")?.list()?)
    }

    pub fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(required(self.categories, "category")?.list()?)
    }

    pub fn list_roles(&self) -> ServiceResult<Vec<Role>> {
        Ok(required(self.roles, "role")?.list()?)
    }

    pub fn list_staff(&self) -> ServiceResult<Vec<Staff>> {
        Ok(required(self.staff, "staff")?.list()?)
    }

    pub fn list_customers(&self) -> ServiceResult<Vec<Customer>> {
        Ok(required(self.customers, "customer")?.list()?)
    }
}

fn required<'a, R: ?Sized>(repo: Option<&'a R>, entity: &'static str) -> ServiceResult<&'a R> {
    repo.ok_or(ServiceError::RepositoryUnavailable(entity))
}
