//! Biography storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where biography records live.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for file-backed records; in-memory storage when unset
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// True when records should be persisted to disk.
    pub fn is_persistent(&self) -> bool {
        self.data_dir.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.data_dir {
            Some(dir) if dir.as_os_str().is_empty() => Err(ValidationError::EmptyDataDir),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_in_memory() {
        let config = StorageConfig::default();
        assert!(!config.is_persistent());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_data_dir_is_rejected() {
        let config = StorageConfig {
            data_dir: Some(PathBuf::new()),
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyDataDir));
    }
}
