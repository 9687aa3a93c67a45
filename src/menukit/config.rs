use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MenuError, Result};
use crate::links::LinkFilter;

const CONFIG_FILENAME: &str = "config.json";

/// Editor configuration, stored as config.json in the menukit config
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Document opened when no --file is given on the command line.
    #[serde(default)]
    pub document_path: Option<PathBuf>,

    /// Button labels treated as structural navigation. Buttons with these
    /// labels never count as cross-references in link listings.
    #[serde(default = "default_nav_labels")]
    pub nav_labels: Vec<String>,

    /// Where the live document sits on the bot host, for pull/push.
    #[serde(default)]
    pub remote_path: Option<String>,
}

fn default_nav_labels() -> Vec<String> {
    vec!["Back".to_string(), "Home".to_string()]
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_path: None,
            nav_labels: default_nav_labels(),
            remote_path: None,
        }
    }
}

impl EditorConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MenuError::Io)?;
        let config: EditorConfig =
            serde_json::from_str(&content).map_err(MenuError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MenuError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MenuError::Serialization)?;
        fs::write(config_path, content).map_err(MenuError::Io)?;
        Ok(())
    }

    /// The link filter built from the configured navigation labels.
    pub fn link_filter(&self) -> LinkFilter {
        LinkFilter::with_labels(self.nav_labels.clone())
    }
}

/// Directory holding config.json.
///
/// `MENUKIT_CONFIG_DIR` overrides the OS-appropriate location; this is
/// primarily used for testing to isolate state.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("MENUKIT_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    directories::ProjectDirs::from("com", "menukit", "menukit")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            MenuError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine a config directory",
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.nav_labels, vec!["Back", "Home"]);
        assert_eq!(config.document_path, None);
        assert_eq!(config.remote_path, None);
    }

    #[test]
    fn test_load_missing_config_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(temp_dir.path().join("nowhere")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut config = EditorConfig::default();
        config.document_path = Some(PathBuf::from("/srv/bot/menu.json"));
        config.nav_labels = vec!["Назад".to_string()];
        config.save(temp_dir.path()).unwrap();

        let loaded = EditorConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_file_takes_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{ "remote_path": "bot/menu.json" }"#,
        )
        .unwrap();

        let loaded = EditorConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.remote_path.as_deref(), Some("bot/menu.json"));
        assert_eq!(loaded.nav_labels, vec!["Back", "Home"]);
    }

    #[test]
    fn test_link_filter_uses_configured_labels() {
        let mut config = EditorConfig::default();
        config.nav_labels = vec!["Menu".to_string()];

        let filter = config.link_filter();
        assert!(filter.excludes(&crate::model::Button::label("Menu")));
        assert!(!filter.excludes(&crate::model::Button::label("Back")));
    }
}
