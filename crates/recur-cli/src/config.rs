//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use recur_core::InferenceConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tuning for the inference engine.
    pub inference: InferenceConfig,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // RECUR_INFERENCE__MIN_GRID_MATCHES=3 sets inference.min_grid_matches
        figment = figment.merge(Env::prefixed("RECUR_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for recur.
///
/// On Linux: `~/.config/recur`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("recur"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_recur() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "recur");
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        assert_eq!(Config::default().inference, InferenceConfig::default());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "recur.toml",
                "[inference]\nmin_grid_matches = 4\nsplit_irregular_series = false\n",
            )?;

            let config = Config::load_from(Some(Path::new("recur.toml")))?;
            assert_eq!(config.inference.min_grid_matches, 4);
            assert!(!config.inference.split_irregular_series);
            assert!(config.inference.split_residual_series);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("recur.toml", "[inference]\nmin_grid_matches = 4\n")?;
            jail.set_env("RECUR_INFERENCE__MIN_GRID_MATCHES", "5");

            let config = Config::load_from(Some(Path::new("recur.toml")))?;
            assert_eq!(config.inference.min_grid_matches, 5);
            Ok(())
        });
    }
}
