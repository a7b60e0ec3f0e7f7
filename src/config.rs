use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::libs::error::AnyResult;

/// Persisted bridge configuration: the tenant credential, the folder used
/// for temporary uploads and the destination picked during the last export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub tenant_token: String,
    pub temp_folder_token: String,
    pub temp_folder_name: String,
    pub last_target_folder_token: String,
    pub last_target_folder_name: String,
}

impl ExportConfig {
    /// Missing file is not an error: first run starts from defaults.
    pub fn load(path: &Path) -> AnyResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> AnyResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        !self.tenant_token.is_empty()
    }

    pub fn has_temp_folder(&self) -> bool {
        !self.temp_folder_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larkport.toml");

        let config = ExportConfig {
            tenant_token: "t-abc".to_string(),
            temp_folder_token: "fldr-tmp".to_string(),
            temp_folder_name: "Staging".to_string(),
            last_target_folder_token: "fldr-dst".to_string(),
            last_target_folder_name: "Notes".to_string(),
        };
        config.save(&path).unwrap();

        assert_eq!(ExportConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ExportConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, ExportConfig::default());
        assert!(!loaded.has_credential());
        assert!(!loaded.has_temp_folder());
    }
}
