//! Project path resolution.
//!
//! Every location the build and the dev server touch is derived from one
//! project root, once, at startup. [`PathSet`] holds no resources and is
//! never mutated after it is built.

use crate::config::{Layout, Target};
use crate::error::{ConfigError, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Bundle entry points, as `(name, module path relative to the project root)`.
///
/// The module path has no extension; the bundler resolves it.
const ENTRY_POINTS: &[(&str, &str)] = &[
    ("background", "src/containers/background/background"),
    ("frame", "src/containers/save/frame/frame"),
    ("save", "src/containers/save/save"),
    ("login", "src/containers/auth/login"),
    ("receiver", "src/containers/auth/receiver"),
    ("wsmwu", "src/containers/wsmwu/wsmwu"),
];

/// A named bundle entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: &'static str,
    pub path: PathBuf,
}

/// Resolved absolute locations for one project and one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub app_directory: PathBuf,
    pub package_json: PathBuf,
    pub yarn_lock: PathBuf,
    /// Static assets copied verbatim into staging
    pub public: PathBuf,
    pub src: PathBuf,
    /// Declarative manifest source (`src/manifest.yml`)
    pub manifest_source: PathBuf,
    /// Scratch output, recreated on every build
    pub staging: PathBuf,
    /// Final deploy directory for the selected target
    pub output: PathBuf,
    /// HTML template for the save page
    pub save_html: PathBuf,
    pub entries: Vec<EntryPoint>,
}

impl PathSet {
    /// Resolve every path from `root`.
    ///
    /// `root` should already be absolute. Fails if staging and output are the
    /// same directory or one contains the other, since staging is emptied on
    /// every build and removed after deploy.
    pub fn resolve(root: &Path, target: Target, layout: &Layout) -> Result<Self> {
        let staging = root.join(&layout.staging_dir);
        let output = root.join(&layout.output_root).join(target.as_str());

        if staging.starts_with(&output) || output.starts_with(&staging) {
            return Err(ConfigError::OverlappingDirectories(staging).into());
        }

        let src = root.join("src");
        let entries = ENTRY_POINTS
            .iter()
            .map(|&(name, rel)| EntryPoint {
                name,
                path: root.join(rel),
            })
            .collect();

        Ok(Self {
            app_directory: root.to_path_buf(),
            package_json: root.join("package.json"),
            yarn_lock: root.join("yarn.lock"),
            public: root.join("public"),
            manifest_source: src.join("manifest.yml"),
            save_html: src.join("containers/save/save.html"),
            src,
            staging,
            output,
            entries,
        })
    }

    /// Resolve from a working directory, canonicalizing it first.
    pub fn from_cwd(cwd: &Path, target: Target, layout: &Layout) -> Result<Self> {
        let root = cwd.canonicalize().with_path(cwd)?;
        Self::resolve(&root, target, layout)
    }

    /// Look up an entry point by name.
    pub fn entry(&self, name: &str) -> Option<&EntryPoint> {
        self.entries.iter().find(|e| e.name == name)
    }
}
