//! Configuration for crxkit.
//!
//! Two values are built once at process start and passed down explicitly:
//!
//! - [`CrxConfig`]: the optional project file `crxkit.config.json`, layered
//!   with figment (defaults < file < `CRXKIT_*` environment)
//! - [`ProcessEnv`]: the process-wide switches shared with create-react-app
//!   style tooling (`CI`, `PORT`, `HOST`, `HTTPS`, `IMAGE_INLINE_SIZE_LIMIT`)
//!
//! Nothing below the command layer reads ambient process state.

mod defaults;
pub mod env;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::cli::Target;
pub use defaults::*;
pub use env::ProcessEnv;

/// Default project config file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "crxkit.config.json";

/// Project configuration, loaded from crxkit.config.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrxConfig {
    /// External bundler invocation
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Scratch directory rebuilt on every build, relative to the project root
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Parent of the per-target deploy directories, relative to the project root
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Quiet period before a file change triggers a rebuild
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// How to run the external bundler.
///
/// The command receives the serialized build configuration through the
/// `CRXKIT_BUILD_CONFIG` environment variable and must print JSON stats
/// (`{"errors": [...], "warnings": [...]}`) on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Program to execute
    #[serde(default = "default_compiler_command")]
    pub command: String,

    /// Arguments passed to the program
    #[serde(default = "default_compiler_args")]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_compiler_command(),
            args: default_compiler_args(),
        }
    }
}

/// Directory layout handed to [`crate::paths::PathSet::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Staging directory, relative to the project root
    pub staging_dir: PathBuf,
    /// Output root, relative to the project root
    pub output_root: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            output_root: default_output_root(),
        }
    }
}

impl CrxConfig {
    /// Directory layout portion of the config.
    pub fn layout(&self) -> Layout {
        Layout {
            staging_dir: self.staging_dir.clone(),
            output_root: self.output_root.clone(),
        }
    }
}

impl Default for CrxConfig {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            staging_dir: default_staging_dir(),
            output_root: default_output_root(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
