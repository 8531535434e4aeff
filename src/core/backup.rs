use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the live database to `dest_file`, optionally zipping it.
    /// Returns the path written, or `None` when the user declined to overwrite.
    pub fn backup(
        pool: &mut DbPool,
        cfg: &Config,
        dest_file: &str,
        compress: bool,
        input: &mut dyn BufRead,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(&cfg.database);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("database {}", src.display())));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        if dest.exists() && !confirm_overwrite(dest, input)? {
            warning("Backup cancelled.");
            return Ok(None);
        }

        // Flush pending WAL pages so the copy is self-contained.
        pool.conn.execute_batch("PRAGMA wal_checkpoint(FULL);").ok();

        fs::copy(src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        let final_path = if compress {
            let zipped = compress_backup(dest)?;
            if zipped != dest {
                match fs::remove_file(dest) {
                    Ok(()) => info(format!("Removed uncompressed copy: {}", dest.display())),
                    Err(e) => warning(format!("Cannot remove uncompressed copy: {e}")),
                }
            }
            zipped
        } else {
            dest.to_path_buf()
        };

        ttlog(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress { "Backup created and compressed" } else { "Backup created" },
        )?;

        Ok(Some(final_path))
    }
}

fn confirm_overwrite(dest: &Path, input: &mut dyn BufRead) -> AppResult<bool> {
    print!("⚠️  '{}' already exists. Overwrite? [y/N] ", dest.display());
    std::io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gigstock.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    info(format!("📦 Compressed: {}", zip_path.display()));
    Ok(zip_path)
}
