use crate::errors::{AppError, AppResult};
use crate::models::staff::Role;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Login used when `--as` is not given on the command line.
    #[serde(default = "default_actor")]
    pub actor: String,
    /// Roles allowed to receive stock and edit products.
    #[serde(default = "default_inventory_roles")]
    pub inventory_roles: Vec<Role>,
    #[serde(default = "default_unit")]
    pub default_unit: String,
    /// Print a line for every committed change.
    #[serde(default = "default_notify")]
    pub notify: bool,
}

fn default_actor() -> String {
    "admin".to_string()
}
fn default_inventory_roles() -> Vec<Role> {
    vec![Role::Admin, Role::Manager]
}
fn default_unit() -> String {
    "ks".to_string()
}
fn default_notify() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            actor: default_actor(),
            inventory_roles: default_inventory_roles(),
            default_unit: default_unit(),
            notify: default_notify(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("gigstock")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".gigstock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("gigstock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("gigstock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("gigstock.sqlite"),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                AppError::from(io::Error::new(
                    e.kind(),
                    format!("cannot create {}: {e}", db_path.display()),
                ))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
