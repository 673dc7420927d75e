use crate::metadata::ProfileDefaults;
use crate::transfer::AmountBounds;
use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    InvalidBounds { min: String, max: String },
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Parse(err)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config file: {}", e),
            ConfigError::InvalidBounds { min, max } => {
                write!(f, "Invalid amount bounds: min '{}', max '{}'", min, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Widget settings. Every key is optional in the file:
///
/// ```json
/// { "ipfsGateway": "https://api.universalprofile.cloud/ipfs/",
///   "metadataRegistryUrl": "http://localhost:8080/profiles",
///   "minAmount": "1", "maxAmount": "1000", "tokenSymbol": "LYX",
///   "profileDefaults": { "displayName": "Anonymous" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub ipfs_gateway: String,
    pub metadata_registry_url: String,
    pub min_amount: String,
    pub max_amount: String,
    pub token_symbol: String,
    pub profile_defaults: ProfileDefaults,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: "https://api.universalprofile.cloud/ipfs/".to_string(),
            metadata_registry_url: "http://localhost:8080/profiles".to_string(),
            min_amount: "1".to_string(),
            max_amount: "1000".to_string(),
            token_symbol: "LYX".to_string(),
            profile_defaults: ProfileDefaults::default(),
        }
    }
}

impl GridConfig {
    /// `~/.config/grid_widget/config.json` on Linux, `%APPDATA%\grid_widget\config.json`
    /// on Windows, etc.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "grid_widget").map(|p| p.config_dir().join("config.json"))
    }

    /// Read the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {:?}", path);
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(io::BufReader::new(file))?)
    }

    /// Read the config at `path`, or at the platform default location when
    /// `path` is `None`. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                info!("No config file found, using defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn amount_bounds(&self) -> Result<AmountBounds, ConfigError> {
        AmountBounds::new(&self.min_amount, &self.max_amount, self.token_symbol.clone()).ok_or_else(
            || ConfigError::InvalidBounds {
                min: self.min_amount.clone(),
                max: self.max_amount.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_give_default_bounds() {
        let bounds = GridConfig::default().amount_bounds().unwrap();
        assert_eq!(bounds, AmountBounds::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "maxAmount": "25", "profileDefaults": {{ "avatarUrl": "/a.png" }} }}"#)
            .unwrap();

        let config = GridConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.max_amount, "25");
        assert_eq!(config.min_amount, "1");
        assert_eq!(config.profile_defaults.avatar_url, "/a.png");
        assert_eq!(config.profile_defaults.display_name, "Anonymous");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridConfig::load_or_default(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = GridConfig {
            min_amount: "10".into(),
            max_amount: "1".into(),
            ..GridConfig::default()
        };
        assert!(matches!(
            config.amount_bounds(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }
}
