use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::HedError;

pub const CONFIG_ENV: &str = "HED_CONFIG";

/// Persistent defaults for `hed group`, read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub exprs: Vec<String>,
    pub canvas_exprs: Vec<String>,
    pub sort: bool,
    pub colors: Vec<i16>,
}

impl Config {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, HedError> {
        toml::from_str(text).map_err(|source| HedError::InvalidConfig {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, HedError> {
        let text = std::fs::read_to_string(path).map_err(|error| HedError::io(path, error))?;
        let config = Self::from_toml(path, &text)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Load the explicit path, else `HED_CONFIG`, else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, HedError> {
        match config_path(explicit) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;

    use super::Config;
    use crate::error::HedError;

    #[test]
    fn all_keys_are_optional() {
        let config = Config::from_toml(Path::new("hed.toml"), "").expect("empty config is valid");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_every_supported_key() {
        let text = r#"
exprs = ["s/^h_/", "n/^h_//"]
canvas_exprs = ["margin 0.1,0.1,0.1,0.1"]
sort = true
colors = [602, 46, 8]
"#;
        let config = Config::from_toml(Path::new("hed.toml"), text).expect("valid config");
        assert_eq!(config.exprs, vec!["s/^h_/", "n/^h_//"]);
        assert_eq!(config.canvas_exprs.len(), 1);
        assert!(config.sort);
        assert_eq!(config.colors, vec![602, 46, 8]);
    }

    #[test]
    fn unknown_keys_are_rejected_with_config_type() {
        let error = Config::from_toml(Path::new("hed.toml"), "expressions = []")
            .expect_err("unknown key");
        assert!(matches!(error, HedError::InvalidConfig { .. }));
        assert_eq!(error.to_error_response().error.r#type, "invalid_config");
    }

    #[test]
    fn explicit_path_is_loaded() {
        let directory = tempdir().expect("tempdir should be created");
        let path = directory.path().join("hed.toml");
        std::fs::write(&path, "sort = true\n").expect("fixture write should succeed");
        let config = Config::resolve(Some(&path)).expect("config should load");
        assert!(config.sort);
    }
}
