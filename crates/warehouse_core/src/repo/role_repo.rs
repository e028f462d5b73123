//! Role repository contract and SQLite implementation.
//!
//! Staff nested in a role are rebuilt from scalar columns only; their
//! `customers` stay empty so the graph never expands past one hop.

use super::error::RepoResult;
use super::mapping::{
    ensure_referenced, fetch_all, fetch_exactly_one, insert_links, load_linked_staff,
};
use crate::db::Session;
use crate::model::personnel::Role;
use crate::model::EntityId;
use log::debug;
use rusqlite::{params, Connection, Row};

const ROLE_SELECT_SQL: &str = "SELECT id, name, description FROM roles";

/// Repository interface for roles and their staff links.
pub trait RoleRepository {
    fn add(&self, role: &Role) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Role>;
    fn list(&self) -> RepoResult<Vec<Role>>;
}

/// SQLite-backed role repository.
pub struct SqliteRoleRepository<'s> {
    session: &'s Session,
}

impl<'s> SqliteRoleRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

impl RoleRepository for SqliteRoleRepository<'_> {
    fn add(&self, role: &Role) -> RepoResult<EntityId> {
        let id = self.session.stage(|conn| -> RepoResult<EntityId> {
            for staff in &role.staffs {
                ensure_referenced(conn, "staff", "staff", staff.id)?;
            }

            conn.execute(
                "INSERT INTO roles (name, description) VALUES (?1, ?2);",
                params![role.name.as_str(), role.description.as_str()],
            )?;
            let id = conn.last_insert_rowid();
            insert_links(
                conn,
                "INSERT INTO role_staff (role_id, staff_id) VALUES (?1, ?2);",
                id,
                role.staffs.iter().map(|staff| staff.id),
            )?;
            Ok(id)
        })?;

        debug!(
            "event=repo_add module=repo entity=role status=staged id={id} staffs={}",
            role.staffs.len()
        );
        Ok(id)
    }

    fn get(&self, id: EntityId) -> RepoResult<Role> {
        let conn = self.session.connection();
        let role = fetch_exactly_one(
            conn,
            &format!("{ROLE_SELECT_SQL} WHERE id = ?1;"),
            "role",
            id,
            role_from_row,
        )?;
        with_staffs(conn, role)
    }

    fn list(&self) -> RepoResult<Vec<Role>> {
        let conn = self.session.connection();
        fetch_all(
            conn,
            &format!("{ROLE_SELECT_SQL} ORDER BY id ASC;"),
            [],
            role_from_row,
        )?
        .into_iter()
        .map(|role| with_staffs(conn, role))
        .collect()
    }
}

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<Role> {
    Ok(Role {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        staffs: Vec::new(),
    })
}

fn with_staffs(conn: &Connection, mut role: Role) -> RepoResult<Role> {
    role.staffs = load_linked_staff(conn, role.id)?;
    Ok(role)
}
