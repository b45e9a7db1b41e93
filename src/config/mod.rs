use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment variable overriding the HTTP port (kept from the first deployment).
pub const PORT_ENV: &str = "ACC_API_PORT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_readings_capacity")]
    pub readings_capacity: usize,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_data_dir() -> String {
    Config::config_dir().join("data").to_string_lossy().to_string()
}
fn default_accounts_file() -> String {
    "accounts.json".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9002
}
fn default_readings_capacity() -> usize {
    1440
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            data_dir: default_data_dir(),
            accounts_file: default_accounts_file(),
            host: default_host(),
            port: default_port(),
            readings_capacity: default_readings_capacity(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtaskmeter")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rtaskmeter")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtaskmeter.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtaskmeter.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// `ACC_API_PORT` wins over the configured port.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(port) = env::var(PORT_ENV) {
            cfg.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("{PORT_ENV} is not a port: {port}")))?;
        }

        Ok(cfg)
    }

    /// Directory holding the account collection and the readings logs.
    pub fn data_path(&self) -> PathBuf {
        crate::utils::path::expand_tilde(&self.data_dir)
    }

    /// Full path of the account collection file.
    pub fn accounts_path(&self) -> PathBuf {
        let p = Path::new(&self.accounts_file);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.data_path().join(p)
        }
    }

    /// Directory with one `{info}_{hepek}.json` file per account.
    pub fn readings_path(&self) -> PathBuf {
        self.data_path().join("readings")
    }

    pub fn database_path(&self) -> PathBuf {
        crate::utils::path::expand_tilde(&self.database)
    }

    /// Initialize configuration, database file and data directory.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(
        custom_db: Option<String>,
        custom_data_dir: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let resolve = |name: String| {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        };

        let db_path = custom_db
            .map(resolve)
            .unwrap_or_else(Self::database_file);
        let data_dir = custom_data_dir
            .map(resolve)
            .unwrap_or_else(|| dir.join("data"));

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        fs::create_dir_all(config.readings_path())?;

        let accounts = config.accounts_path();
        if !accounts.exists() {
            fs::write(&accounts, "[]")?;
        }

        Ok(config)
    }
}
