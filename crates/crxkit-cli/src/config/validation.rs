use crate::config::{CrxConfig, Target};
use crate::error::{ConfigError, Result};
use std::path::{Component, Path};

/// Reject layout directories that would escape or overwrite the project root.
pub fn validate_relative_dir(field: &str, dir: &Path) -> Result<()> {
    let escapes = dir
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

    if dir.as_os_str().is_empty() || dir == Path::new(".") || escapes {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: dir.display().to_string(),
            hint: "Use a relative directory inside the project, e.g. \"_build\"".to_string(),
        }
        .into());
    }

    Ok(())
}

impl CrxConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.compiler.command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "compiler.command".to_string(),
                value: self.compiler.command.clone(),
                hint: "Set the bundler executable, e.g. \"npx\"".to_string(),
            }
            .into());
        }

        validate_relative_dir("staging_dir", &self.staging_dir)?;
        validate_relative_dir("output_root", &self.output_root)?;

        // Staging is emptied on every build, so it may not share a subtree with
        // any target's deploy directory.
        for target in [Target::Firefox, Target::Chrome] {
            let output = self.output_root.join(target.as_str());
            if self.staging_dir.starts_with(&output) || output.starts_with(&self.staging_dir) {
                return Err(ConfigError::OverlappingDirectories(self.staging_dir.clone()).into());
            }
        }

        if self.debounce_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "debounce_ms".to_string(),
                value: self.debounce_ms.to_string(),
                hint: "Keep the debounce window under 10 seconds".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
