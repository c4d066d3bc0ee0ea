//! A [`Compiler`] that runs an external bundler process.
//!
//! The bundler is started in the project root with:
//!
//! - `CRXKIT_BUILD_CONFIG`: path to a temporary JSON file holding the
//!   serialized [`BuildConfiguration`]
//! - `NODE_ENV` / `BABEL_ENV`: `production` or `development`
//! - `PROJECT`: the browser target
//!
//! It must print its stats as JSON on stdout. Only `errors` and `warnings` are
//! read; each entry may be a string or an object with a `message` field.

use super::{BuildConfiguration, CompileError, CompileOutput, Compiler, Diagnostics};
use crate::config::CompilerConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable naming the serialized build configuration file.
pub const BUILD_CONFIG_ENV: &str = "CRXKIT_BUILD_CONFIG";

/// Runs the project's bundler as a child process.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Build from the `compiler` section of the project config.
    pub fn from_config(config: &CompilerConfig, cwd: &Path) -> Self {
        Self::new(config.command.clone(), config.args.clone(), cwd)
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_config(&self, config: &BuildConfiguration) -> Result<tempfile::NamedTempFile, CompileError> {
        let json = config.to_json().map_err(|e| {
            CompileError::Configuration(format!("Failed to serialize build configuration: {}", e))
        })?;

        tempfile::Builder::new()
            .prefix("crxkit-build-")
            .suffix(".json")
            .tempfile()
            .and_then(|mut file| {
                file.write_all(json.as_bytes())?;
                file.flush()?;
                Ok(file)
            })
            .map_err(|e| {
                CompileError::Configuration(format!("Failed to write build configuration: {}", e))
            })
    }
}

#[async_trait]
impl Compiler for CommandCompiler {
    async fn run(&self, config: &BuildConfiguration) -> Result<CompileOutput, CompileError> {
        // Dropping the handle deletes the file, so it lives until the child exits.
        let config_file = self.write_config(config)?;
        let mode = config.mode().as_str();

        tracing::debug!(
            command = %self.command_line(),
            config = %config_file.path().display(),
            mode,
            "Starting bundler"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .env(BUILD_CONFIG_ENV, config_file.path())
            .env("NODE_ENV", mode)
            .env("BABEL_ENV", mode)
            .env("PROJECT", config.target().as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                CompileError::Configuration(format!(
                    "Failed to start `{}`: {}",
                    self.command_line(),
                    e
                ))
            })?;

        drop(config_file);

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "Bundler stderr");
        }

        parse_output(&output.stdout, output.status.success(), stderr.trim())
    }
}

#[derive(Debug, Deserialize)]
struct RawStats {
    #[serde(default)]
    errors: Vec<RawMessage>,
    #[serde(default)]
    warnings: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Text(String),
    Detailed {
        message: String,
        #[serde(default, rename = "moduleName")]
        module_name: Option<String>,
    },
}

impl RawMessage {
    fn into_text(self) -> String {
        match self {
            RawMessage::Text(text) => text,
            RawMessage::Detailed {
                message,
                module_name: Some(module),
            } if !message.starts_with(&module) => format!("{}\n{}", module, message),
            RawMessage::Detailed { message, .. } => message,
        }
    }
}

/// Interpret bundler stdout.
///
/// A run that printed valid stats is a successful compile even when the exit
/// status is non-zero, as long as the stats carry at least one error.
fn parse_output(stdout: &[u8], success: bool, stderr: &str) -> Result<CompileOutput, CompileError> {
    let failure_detail = || {
        if stderr.is_empty() {
            "The bundler exited without reporting any errors".to_string()
        } else {
            stderr.to_string()
        }
    };

    let stats: serde_json::Value = match serde_json::from_slice(stdout) {
        Ok(stats) => stats,
        Err(_) if !success => return Err(CompileError::Configuration(failure_detail())),
        Err(e) => {
            return Err(CompileError::Configuration(format!(
                "Bundler output is not valid JSON stats: {}",
                e
            )))
        }
    };

    let raw: RawStats = serde_json::from_value(stats.clone()).map_err(|e| {
        CompileError::Configuration(format!("Unexpected bundler stats shape: {}", e))
    })?;

    let diagnostics = Diagnostics::new(
        raw.errors.into_iter().map(RawMessage::into_text).collect(),
        raw.warnings.into_iter().map(RawMessage::into_text).collect(),
    );

    if !success && !diagnostics.has_errors() {
        return Err(CompileError::Configuration(failure_detail()));
    }

    Ok(CompileOutput {
        diagnostics,
        stats: Some(stats),
    })
}
