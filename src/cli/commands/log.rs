use crate::cli::parser::Commands;
use crate::cli::session::open_db;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, tail } = cmd {
        let pool = open_db(cfg)?;
        LogLogic::print_log(&pool, *tail)?;
    }

    Ok(())
}
