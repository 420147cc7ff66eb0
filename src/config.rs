//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config FILE`, else `$XDG_CONFIG_HOME/minmax/minmax.toml`
//! 3. Environment variables: `MINMAX_*` prefix
//! 4. Command line flags (applied by the CLI layer)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, IoResultExt};
use crate::domain::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "MINMAX";

/// Unified configuration for minmax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Deepest expression tree that will be built
    pub max_depth: usize,
    /// Print the parsed tree to stderr before the result
    pub show_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            show_tree: false,
        }
    }
}

/// Get the XDG config directory for minmax.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "minmax").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("minmax.toml"))
}

impl Settings {
    /// Load settings with layered precedence, reading `MINMAX_*` from the process environment.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; replaces the global file when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(config_file, None)
    }

    /// Like [`Settings::load`], with environment overrides taken from `env`
    /// instead of the process environment.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: HashMap<String, String>,
    ) -> Result<Self, ApplicationError> {
        Self::load_layers(config_file, Some(env))
    }

    fn load_layers(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("max_depth", defaults.max_depth as i64)
            .map_err(config_err)?
            .set_default("show_tree", defaults.show_tree)
            .map_err(config_err)?;

        // An explicit file must exist; the global one is optional
        match config_file {
            Some(path) => {
                debug!("config: explicit file {}", path.display());
                builder = builder.add_source(
                    File::from(path.to_path_buf())
                        .format(FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        debug!("config: global file {}", global_path.display());
                        builder = builder.add_source(
                            File::from(global_path)
                                .format(FileFormat::Toml)
                                .required(false),
                        );
                    }
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(ApplicationError::Config {
                message: format!("max_depth must be at most {}", MAX_DEPTH_CEILING),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Write the template to `path`, creating parent directories.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_template(path: &Path) -> Result<(), ApplicationError> {
        if path.exists() {
            return Err(ApplicationError::Config {
                message: format!("config file already exists: {}", path.display()),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_path_context("create config dir", parent)?;
        }
        std::fs::write(path, Self::template()).with_path_context("write config", path)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# minmax configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/minmax/minmax.toml  (or --config FILE)
#   Env:  MINMAX_* environment variables, e.g. MINMAX_MAX_DEPTH=64
#   CLI:  --max-depth, --tree

# Deepest expression tree that will be built; deeper input is rejected
# as an invalid expression (1 to 4096)
# max_depth = 1024

# Print the parsed tree to stderr before the result
# show_tree = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn given_no_sources_when_loading_then_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let settings = Settings::load_with_env(Some(&path), HashMap::new()).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_depth, 1024);
    }

    #[test]
    fn given_env_override_when_loading_then_env_wins() {
        let settings = Settings::load_with_env(
            None,
            env(&[("MINMAX_MAX_DEPTH", "12"), ("MINMAX_SHOW_TREE", "true")]),
        )
        .expect("load");
        assert_eq!(settings.max_depth, 12);
        assert!(settings.show_tree);
    }

    #[test]
    fn given_zero_depth_when_validating_then_fails() {
        let settings = Settings {
            max_depth: 0,
            show_tree: false,
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_depth_above_ceiling_when_validating_then_fails() {
        let at_ceiling = Settings {
            max_depth: MAX_DEPTH_CEILING,
            show_tree: false,
        };
        assert!(at_ceiling.validate().is_ok());

        let above = Settings {
            max_depth: MAX_DEPTH_CEILING + 1,
            ..at_ceiling
        };
        match above.validate() {
            Err(ApplicationError::Config { message }) => {
                assert_eq!(message, "max_depth must be at most 4096")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn given_huge_env_depth_when_loading_then_fails() {
        let result = Settings::load_with_env(None, env(&[("MINMAX_MAX_DEPTH", "1000000")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).expect("parse template");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let settings = Settings {
            max_depth: 7,
            show_tree: true,
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("max_depth = 7"));
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
    }
}
