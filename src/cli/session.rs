//! Per-invocation context of the commands that act on behalf of someone.

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::notify::{self, ChangeNotifier};
use crate::core::policy::{AccessPolicy, Actor};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::time::now_or;
use chrono::NaiveDateTime;
use std::path::Path;

pub struct Session {
    pub pool: DbPool,
    pub actor: Actor,
    pub policy: AccessPolicy,
    pub notifier: Box<dyn ChangeNotifier>,
}

/// Open an existing database; never creates one behind the user's back.
pub fn open_db(cfg: &Config) -> AppResult<DbPool> {
    if !Path::new(&cfg.database).exists() {
        return Err(AppError::NotFound(format!(
            "database {} (run `gigstock init` first)",
            cfg.database
        )));
    }
    Ok(DbPool::new(&cfg.database)?)
}

impl Session {
    /// Resolve the acting staff member from `--as`, else from the config.
    pub fn open(cli: &Cli, cfg: &Config) -> AppResult<Self> {
        let pool = open_db(cfg)?;
        let login = cli.as_login.as_deref().unwrap_or(&cfg.actor);
        let actor = Actor::resolve(&pool.conn, login)?;

        Ok(Self {
            pool,
            actor,
            policy: AccessPolicy::from_config(cfg),
            notifier: notify::from_flag(cfg.notify),
        })
    }

    /// Wall clock, or the hidden `--at` override.
    pub fn now(cli: &Cli) -> AppResult<NaiveDateTime> {
        now_or(cli.at.as_deref())
    }
}
