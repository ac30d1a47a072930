//! Configuration loading and root folder resolution
//!
//! Zero-config startup: every tier has a usable fallback, so the service
//! always comes up with a working database and audio directory.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Default listen port when neither `--port` nor `ANNEVAL_PORT` is set
pub const DEFAULT_PORT: u16 = 5760;

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable `ANNEVAL_ROOT_FOLDER`
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("ANNEVAL_ROOT_FOLDER") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the listen port: CLI argument, then `ANNEVAL_PORT`, then default
pub fn resolve_port(cli_arg: Option<u16>) -> u16 {
    if let Some(port) = cli_arg {
        return port;
    }

    if let Ok(value) = std::env::var("ANNEVAL_PORT") {
        if let Ok(port) = value.trim().parse() {
            return port;
        }
    }

    DEFAULT_PORT
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/anneval/config.toml first, then /etc/anneval/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("anneval").join("config.toml"));
        let system_config = PathBuf::from("/etc/anneval/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("anneval").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", config_path)))
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("anneval"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/anneval"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("anneval"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/anneval"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("anneval"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\anneval"))
    } else {
        PathBuf::from("./anneval_data")
    }
}

/// Initialized root folder layout: database file plus audio file store
#[derive(Debug, Clone)]
pub struct RootFolder {
    root: PathBuf,
}

impl RootFolder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root folder and audio directory if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.audio_dir())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root.join("anneval.db")
    }

    /// Directory holding uploaded announcement audio files
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio-files")
    }
}
