//! Shared utilities for command implementations.
//!
//! - Project root resolution
//! - Package manager detection
//! - `package.json` metadata for the dev server banner

use crate::dev::ProjectInfo;
use crate::error::{CliError, Result};
use crate::paths::PathSet;
use crate::ui;
use std::path::{Path, PathBuf};

/// Package manager in use, detected from the lock file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// Yarn when `yarn.lock` exists, npm otherwise.
    pub fn detect(yarn_lock: &Path) -> Self {
        if yarn_lock.is_file() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    /// How to invoke the `build` script.
    pub fn build_cmd(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm run build",
            PackageManager::Yarn => "yarn build",
        }
    }
}

/// Walks up the directory tree to find the nearest package.json.
///
/// Returns the directory containing it, or `None` at the filesystem root.
pub fn find_package_json(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        if current.join("package.json").is_file() {
            return Some(current.to_path_buf());
        }

        current = current.parent()?;
    }
}

/// Read the `name` field of a package.json.
pub fn read_package_name(package_json: &Path) -> Option<String> {
    let content = std::fs::read_to_string(package_json).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value
        .get("name")
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Banner details for the dev server.
pub fn project_info(paths: &PathSet) -> ProjectInfo {
    let name = read_package_name(&paths.package_json).unwrap_or_else(|| {
        paths
            .app_directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ProjectInfo::default().name)
    });

    ProjectInfo {
        name,
        build_command: PackageManager::detect(&paths.yarn_lock)
            .build_cmd()
            .to_string(),
    }
}

/// Resolves the project root directory.
///
/// Resolution priority (highest to lowest):
/// 1. Explicit `--cwd` flag if provided
/// 2. Nearest package.json walking up from the current directory
/// 3. Fallback to the current directory with a warning
///
/// # Errors
/// - Explicit cwd doesn't exist or isn't a directory
/// - Cannot determine current working directory
pub fn resolve_project_root(explicit_cwd: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(CliError::Io)?;

    if let Some(cwd_path) = explicit_cwd {
        let absolute = if cwd_path.is_absolute() {
            cwd_path.to_path_buf()
        } else {
            current_dir.join(cwd_path)
        };

        if !absolute.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "Specified --cwd is not a directory: {}",
                absolute.display()
            )));
        }

        tracing::debug!(root = %absolute.display(), "Using project root from --cwd");
        return Ok(absolute);
    }

    if let Some(package_root) = find_package_json(&current_dir) {
        tracing::debug!(root = %package_root.display(), "Detected project root from package.json");
        return Ok(package_root);
    }

    ui::warning(&format!(
        "No package.json found. Using current directory: {}",
        current_dir.display()
    ));

    Ok(current_dir)
}
