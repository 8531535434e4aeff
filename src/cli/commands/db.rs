use crate::cli::parser::Commands;
use crate::cli::session::open_db;
use crate::config::Config;
use crate::core::scheduler::Scheduler;
use crate::db::migrate::run_pending_migrations;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let pool = open_db(cfg)?;

        if *migrate {
            println!("{CYAN}▶ Running migrations…{RESET}");
            let applied = run_pending_migrations(&pool.conn)?;
            if applied.is_empty() {
                println!("{GREEN}✔ Schema already up to date.{RESET}\n");
            } else {
                println!("{GREEN}✔ {} migration(s) applied.{RESET}\n", applied.len());
            }
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            println!("{CYAN}▶ Running integrity check…{RESET}");

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{GREEN}✔ Integrity check passed.{RESET}");
            } else {
                println!("{RED}✘ Integrity check failed:{RESET} {integrity}");
            }

            let orphans = Scheduler::orphan_count(&pool.conn)?;
            if orphans == 0 {
                println!("{GREEN}✔ No orphaned event rows.{RESET}\n");
            } else {
                println!("{YELLOW}⚠ {orphans} row(s) reference a deleted event.{RESET}\n");
            }
        }

        if *vacuum {
            println!("{CYAN}▶ Running VACUUM…{RESET}");
            pool.conn.execute_batch("VACUUM;")?;
            println!("{GREEN}✔ Vacuum completed.{RESET}\n");
        }
    }

    Ok(())
}
