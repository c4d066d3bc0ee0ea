//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use crxkit_cli::compiler::{BuildConfiguration, CompileError, CompileOutput, Compiler, Diagnostics};
use crxkit_cli::config::{Layout, Target};
use crxkit_cli::paths::PathSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const MANIFEST_YML: &str = "\
manifest_version: 2
name: Pocket Saver
permissions:
- tabs
- contextMenus
version: 1.4.0
";

/// A minimal extension project: `public/icon.png` and `src/manifest.yml`.
pub struct Project {
    pub temp: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("public/icon.png"), b"\x89PNG\r\n").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/manifest.yml"), MANIFEST_YML).unwrap();
        fs::write(root.join("package.json"), r#"{"name": "pocket-saver"}"#).unwrap();

        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn paths(&self, target: Target) -> PathSet {
        PathSet::from_cwd(self.root(), target, &Layout::default()).unwrap()
    }
}

/// A [`Compiler`] that writes fixed artifacts and reports fixed diagnostics.
pub struct ScriptedCompiler {
    artifacts: Vec<(&'static str, &'static str)>,
    result: Result<Diagnostics, String>,
    calls: AtomicUsize,
}

impl ScriptedCompiler {
    pub fn clean() -> Self {
        Self::with(Diagnostics::default())
    }

    pub fn with(diagnostics: Diagnostics) -> Self {
        Self {
            artifacts: vec![("js/background.bundle.js", "console.log('bg');")],
            result: Ok(diagnostics),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn errors(errors: &[&str]) -> Self {
        Self::with(Diagnostics::new(
            errors.iter().map(|s| s.to_string()).collect(),
            vec![],
        ))
    }

    pub fn warnings(warnings: &[&str]) -> Self {
        Self::with(Diagnostics::new(
            vec![],
            warnings.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn failing(message: &str) -> Self {
        Self {
            artifacts: vec![],
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Compiler for ScriptedCompiler {
    async fn run(&self, config: &BuildConfiguration) -> Result<CompileOutput, CompileError> {
        for (rel, content) in &self.artifacts {
            let path = config.output_dir().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        let diagnostics = self.result.clone().map_err(CompileError::Configuration)?;
        Ok(diagnostics.into())
    }
}

/// Sorted relative paths of every file under `dir`.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
