use crate::cli::parser::Commands;
use crate::cli::session::open_db;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        let mut pool = open_db(cfg)?;
        let stdin = std::io::stdin();
        BackupLogic::backup(&mut pool, cfg, file, *compress, &mut stdin.lock())?;
    }

    Ok(())
}
