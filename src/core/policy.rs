//! Who may do what.
//!
//! The core operations never check permissions themselves; the command
//! handlers resolve an [`Actor`] and consult [`AccessPolicy`] first.

use crate::config::Config;
use crate::core::assignment::Assignment;
use crate::db::queries::find_staff_by_login;
use crate::errors::{AppError, AppResult};
use crate::models::staff::{Role, Staff};
use rusqlite::Connection;

/// The authenticated staff member a command runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub staff_id: i64,
    pub login: String,
    pub role: Role,
    pub inventory_grant: bool,
}

impl From<&Staff> for Actor {
    fn from(s: &Staff) -> Self {
        Self {
            staff_id: s.id,
            login: s.login.clone(),
            role: s.role,
            inventory_grant: s.inventory_grant,
        }
    }
}

impl Actor {
    /// Look up an active staff member by login.
    pub fn resolve(conn: &Connection, login: &str) -> AppResult<Self> {
        let staff = find_staff_by_login(conn, login)?
            .ok_or_else(|| AppError::NotFound(format!("staff '{login}'")))?;
        if !staff.active {
            return Err(AppError::Policy(format!("account '{login}' is deactivated")));
        }
        Ok(Actor::from(&staff))
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Manager)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Event,
    All,
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    inventory_roles: Vec<Role>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(vec![Role::Admin, Role::Manager])
    }
}

impl AccessPolicy {
    pub fn new(inventory_roles: Vec<Role>) -> Self {
        Self { inventory_roles }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.inventory_roles.clone())
    }

    pub fn can_manage_events(&self, actor: &Actor) -> bool {
        actor.is_privileged()
    }

    pub fn can_manage_inventory(&self, actor: &Actor) -> bool {
        actor.role == Role::Admin
            || actor.inventory_grant
            || self.inventory_roles.contains(&actor.role)
    }

    pub fn can_view_event(&self, conn: &Connection, actor: &Actor, event_id: i64) -> AppResult<bool> {
        if actor.is_privileged() {
            return Ok(true);
        }
        Assignment::is_assigned(conn, event_id, actor.staff_id)
    }

    /// Clocking in/out is open to the event's crew and to privileged staff.
    pub fn can_track_time(&self, conn: &Connection, actor: &Actor, event_id: i64) -> AppResult<bool> {
        self.can_view_event(conn, actor, event_id)
    }

    pub fn can_manage_staff_credentials(&self, actor: &Actor) -> bool {
        actor.role == Role::Admin
    }

    pub fn can_reset_hours(&self, actor: &Actor, scope: ResetScope) -> bool {
        match scope {
            ResetScope::Event => actor.is_privileged(),
            ResetScope::All => actor.role == Role::Admin,
        }
    }
}

/// Turn a failed predicate into a `Policy` error.
pub fn require(allowed: bool, actor: &Actor, action: &str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Policy(format!(
            "'{}' ({}) may not {action}",
            actor.login,
            actor.role.to_db_str()
        )))
    }
}
