//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CHORDLAB_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "chordlab.db";

/// Default backup file name inside the root folder
pub const BACKUP_FILE: &str = "songs.json";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5001;

/// Optional settings read from `config.toml`
///
/// Every field is optional; a missing or unreadable file yields the default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub backup_file: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the first config file found on this platform
    ///
    /// Missing files are not an error; malformed files are logged and ignored.
    pub fn load() -> Self {
        let Some(path) = find_config_file() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|content| Self::parse(&content))
        {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Locate the config file for the platform, if any exists
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("chordlab").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/chordlab/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("chordlab"))
        .unwrap_or_else(|| PathBuf::from("./chordlab_data"))
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub backup_path: PathBuf,
    pub port: u16,
}

impl ServiceConfig {
    /// Combine resolved root folder with optional overrides
    ///
    /// A relative backup path is taken relative to the root folder.
    pub fn new(root_folder: PathBuf, port: Option<u16>, backup_file: Option<PathBuf>) -> Self {
        let database_path = root_folder.join(DATABASE_FILE);
        let backup_path = match backup_file {
            Some(path) if path.is_absolute() => path,
            Some(path) => root_folder.join(path),
            None => root_folder.join(BACKUP_FILE),
        };

        Self {
            root_folder,
            database_path,
            backup_path,
            port: port.unwrap_or(DEFAULT_PORT),
        }
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_toml() {
        let config = TomlConfig::parse(
            r#"
            root_folder = "/srv/chordlab"
            port = 6001
            backup_file = "export/songs.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/chordlab")));
        assert_eq!(config.port, Some(6001));
        assert_eq!(config.backup_file, Some(PathBuf::from("export/songs.json")));
    }

    #[test]
    fn test_parse_empty_toml() {
        assert_eq!(TomlConfig::parse("").unwrap(), TomlConfig::default());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = TomlConfig::parse("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_argument_wins() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let resolved = resolve_root_folder(
            Some(Path::new("/from/cli")),
            "CHORDLAB_TEST_UNSET_VARIABLE",
            &toml,
        );
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_used_without_cli_or_env() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let resolved = resolve_root_folder(None, "CHORDLAB_TEST_UNSET_VARIABLE", &toml);
        assert_eq!(resolved, PathBuf::from("/from/toml"));
    }

    #[test]
    fn test_service_config_paths() {
        let config = ServiceConfig::new(PathBuf::from("/data"), None, None);
        assert_eq!(config.database_path, PathBuf::from("/data/chordlab.db"));
        assert_eq!(config.backup_path, PathBuf::from("/data/songs.json"));
        assert_eq!(config.port, DEFAULT_PORT);

        let relative = ServiceConfig::new(
            PathBuf::from("/data"),
            Some(8080),
            Some(PathBuf::from("backup/all.json")),
        );
        assert_eq!(relative.backup_path, PathBuf::from("/data/backup/all.json"));
        assert_eq!(relative.port, 8080);

        let absolute =
            ServiceConfig::new(PathBuf::from("/data"), None, Some(PathBuf::from("/tmp/x.json")));
        assert_eq!(absolute.backup_path, PathBuf::from("/tmp/x.json"));
    }
}
