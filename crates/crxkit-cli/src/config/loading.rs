use crate::config::{CrxConfig, CONFIG_FILE_NAME};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use std::path::Path;

/// Environment keys (after the `CRXKIT_` prefix) that may override the file.
const ENV_KEYS: &[&str] = &["staging_dir", "output_root", "debounce_ms"];

impl CrxConfig {
    /// Load configuration from multiple sources.
    ///
    /// Priority: `CRXKIT_*` environment > config file > defaults. An explicit
    /// `config_path` must exist; the default `<root>/crxkit.config.json` is
    /// optional.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        Self::figment(root, config_path)?
            .merge(Env::prefixed("CRXKIT_").only(ENV_KEYS))
            .extract()
            .map_err(invalid)
    }

    /// Load configuration from defaults and file only, ignoring the environment.
    pub fn load_file(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        Self::figment(root, config_path)?
            .extract()
            .map_err(invalid)
    }

    fn figment(root: &Path, config_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "Loading project config");
            figment = figment.merge(Json::file(path));
        }

        Ok(figment)
    }
}

fn invalid(e: figment::Error) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: "configuration".to_string(),
        value: e.to_string(),
        hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
    }
    .into()
}
