//! Configuration and local state locations
//!
//! Everything `vit` persists (config file, session, query cache) lives under
//! one state directory: `--state-dir` / `VIT_STATE_DIR` when given, otherwise
//! the platform config dir. Settings merge in priority order: built-in
//! defaults, then the config file, then environment variables; the
//! `--base-url` flag wins over all of them at the call site.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default API endpoint when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Where local state lives
#[derive(Debug, Clone)]
pub struct StatePaths {
    dir: PathBuf,
}

impl StatePaths {
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        let dir = override_dir
            .map(Path::to_path_buf)
            .or_else(|| {
                directories::ProjectDirs::from("", "", "vit")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from(".vit"));

        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join("config.yaml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    pub fn cache_file(&self) -> PathBuf {
        self.dir.join("cache.db")
    }
}

/// User configuration, loaded from `config.yaml` under the state dir
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base endpoint of the inventory API
    pub base_url: Option<String>,

    /// Default output format for list commands
    pub default_format: Option<String>,

    /// Fill empty wing/unit listings with the built-in demo dataset
    pub demo_data: Option<bool>,
}

impl Config {
    /// Load configuration, merging file then environment
    pub fn load(paths: &StatePaths) -> Self {
        let mut config = Config::default();

        let file = paths.config_file();
        if file.exists() {
            if let Ok(contents) = std::fs::read_to_string(&file) {
                if let Ok(from_file) = serde_yml::from_str::<Config>(&contents) {
                    config.merge(from_file);
                }
            }
        }

        if let Ok(base_url) = std::env::var("VIT_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(demo) = std::env::var("VIT_DEMO_DATA") {
            config.demo_data = Some(matches!(demo.as_str(), "1" | "true" | "yes" | "on"));
        }

        config
    }

    fn merge(&mut self, other: Config) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.demo_data.is_some() {
            self.demo_data = other.demo_data;
        }
    }

    /// Effective base URL; the `flag` is the `--base-url` global option
    pub fn base_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Demo-data fallback is on unless switched off
    pub fn demo_data(&self) -> bool {
        self.demo_data.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_priority() {
        let config = Config {
            base_url: Some("http://config.example/api".into()),
            ..Default::default()
        };
        assert_eq!(
            config.base_url(Some("http://flag.example/api")),
            "http://flag.example/api"
        );
        assert_eq!(config.base_url(None), "http://config.example/api");
        assert_eq!(Config::default().base_url(None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_demo_data_defaults_on() {
        assert!(Config::default().demo_data());
        let off = Config {
            demo_data: Some(false),
            ..Default::default()
        };
        assert!(!off.demo_data());
    }

    #[test]
    fn test_state_paths_override() {
        let paths = StatePaths::resolve(Some(Path::new("/tmp/vit-test")));
        assert_eq!(paths.session_file(), Path::new("/tmp/vit-test/session.json"));
        assert_eq!(paths.cache_file(), Path::new("/tmp/vit-test/cache.db"));
    }

    #[test]
    fn test_config_file_merge() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.yaml"),
            "base_url: http://file.example/api\ndemo_data: false\n",
        )
        .unwrap();

        let paths = StatePaths::resolve(Some(tmp.path()));
        // Scope the assertion to the file layer to stay independent of
        // VIT_BASE_URL in the test environment.
        let mut config = Config::default();
        let contents = std::fs::read_to_string(paths.config_file()).unwrap();
        config.merge(serde_yml::from_str(&contents).unwrap());

        assert_eq!(config.base_url(None), "http://file.example/api");
        assert!(!config.demo_data());
    }
}
