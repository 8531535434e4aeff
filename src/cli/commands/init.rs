use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::{init_db, seed_admin};
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`), the
/// SQLite database with every pending migration, and the first admin
/// account when no staff exists yet.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing gigstock…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", cfg.database);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    if seed_admin(&pool.conn)? {
        info("Created the first account: login 'admin' (role admin).");
    }

    log::ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", cfg.database),
    )?;

    success("gigstock initialization completed!");
    Ok(())
}
