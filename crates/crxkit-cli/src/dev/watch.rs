//! Watch-exclusion policy.
//!
//! `node_modules` trees are ignored everywhere except under the project's
//! own `src/`, which carries a vendored library that must be watched like
//! first-party code.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NODE_MODULES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\\/]node_modules[\\/]").ok());

/// Decides which changed paths the dev server reacts to.
#[derive(Debug, Clone)]
pub struct WatchPolicy {
    src: PathBuf,
}

impl WatchPolicy {
    pub fn new(src: &Path) -> Self {
        Self {
            src: src.to_path_buf(),
        }
    }

    /// Whether a change to `path` should be ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if path.starts_with(&self.src) {
            return false;
        }
        NODE_MODULES
            .as_ref()
            .is_some_and(|re| re.is_match(&path.to_string_lossy()))
    }

    /// The same policy as a JavaScript regular expression source, for the
    /// bundler's own watcher.
    pub fn pattern_source(&self) -> String {
        let src = self.src.to_string_lossy().replace('\\', "/");
        let src = regex::escape(&src).replace('/', r"[\\/]");
        format!(r"^(?!{}[\\/]).+[\\/]node_modules[\\/]", src)
    }
}
