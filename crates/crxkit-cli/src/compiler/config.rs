//! Build configuration handed to the bundler.
//!
//! There is one builder, [`BuildConfiguration::new`], fed an explicit
//! [`BuildOptions`]. The production and development variants are two
//! constructors over the same options, never copies of each other.

use crate::config::{ProcessEnv, Target};
use crate::dev::urls::Urls;
use crate::dev::watch::WatchPolicy;
use crate::paths::PathSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Entry points compiled by the dev server.
const DEVELOPMENT_ENTRIES: &[&str] = &["background", "frame"];

const FILENAME_TEMPLATE: &str = "js/[name].bundle.js";
const CHUNK_FILENAME_TEMPLATE: &str = "js/[name].chunk.js";
const DEVELOPMENT_DEVTOOL: &str = "cheap-module-source-map";

/// Bundler optimization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Value exported as `NODE_ENV`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Production => "production",
            Mode::Development => "development",
        }
    }
}

/// An HTML page generated from a template, with the chunks it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPage {
    pub template: PathBuf,
    pub filename: String,
    pub chunks: Vec<String>,
}

/// Everything that varies between builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    pub mode: Mode,
    pub target: Target,
    /// Project root; relative paths in the bundler resolve from here
    pub context: PathBuf,
    /// First-party sources, the only tree linted and transpiled
    pub source_dir: PathBuf,
    /// Entry name to module path
    pub entries: BTreeMap<String, PathBuf>,
    /// Where artifacts are written
    pub output_dir: PathBuf,
    pub filename_template: String,
    pub chunk_filename_template: String,
    /// Images at or below this many bytes are inlined as data URLs
    pub image_inline_limit: u64,
    pub html_pages: Vec<HtmlPage>,
    /// Watch-exclusion pattern, as a JavaScript regular expression source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_ignore: Option<String>,
    /// Dev-server URLs the live-reload client may connect to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub live_reload: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtool: Option<String>,
}

/// An immutable bundler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildConfiguration {
    options: BuildOptions,
}

impl BuildConfiguration {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// One-shot production build of every entry point into staging.
    pub fn production(paths: &PathSet, env: &ProcessEnv, target: Target) -> Self {
        let entries = paths
            .entries
            .iter()
            .map(|e| (e.name.to_string(), e.path.clone()))
            .collect();

        Self::new(Self::base_options(paths, env, target, Mode::Production, entries))
    }

    /// Incremental development build bound to the dev-server URLs.
    pub fn development(
        paths: &PathSet,
        env: &ProcessEnv,
        target: Target,
        urls: &Urls,
        watch: &WatchPolicy,
    ) -> Self {
        let entries = paths
            .entries
            .iter()
            .filter(|e| DEVELOPMENT_ENTRIES.contains(&e.name))
            .map(|e| (e.name.to_string(), e.path.clone()))
            .collect();

        let mut options = Self::base_options(paths, env, target, Mode::Development, entries);
        options.watch_ignore = Some(watch.pattern_source());
        options.live_reload = urls.all().map(str::to_string).collect();
        options.devtool = Some(DEVELOPMENT_DEVTOOL.to_string());

        Self::new(options)
    }

    fn base_options(
        paths: &PathSet,
        env: &ProcessEnv,
        target: Target,
        mode: Mode,
        entries: BTreeMap<String, PathBuf>,
    ) -> BuildOptions {
        BuildOptions {
            mode,
            target,
            context: paths.app_directory.clone(),
            source_dir: paths.src.clone(),
            entries,
            output_dir: paths.staging.clone(),
            filename_template: FILENAME_TEMPLATE.to_string(),
            chunk_filename_template: CHUNK_FILENAME_TEMPLATE.to_string(),
            image_inline_limit: env.image_inline_size_limit,
            html_pages: vec![HtmlPage {
                template: paths.save_html.clone(),
                filename: "save.html".to_string(),
                chunks: vec!["save".to_string()],
            }],
            watch_ignore: None,
            live_reload: Vec::new(),
            devtool: None,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    pub fn target(&self) -> Target {
        self.options.target
    }

    pub fn output_dir(&self) -> &Path {
        &self.options.output_dir
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;

    fn paths() -> PathSet {
        PathSet::resolve(Path::new("/ext"), Target::Firefox, &Layout::default()).unwrap()
    }

    #[test]
    fn test_production_configuration() {
        let env = ProcessEnv {
            image_inline_size_limit: 4096,
            ..ProcessEnv::default()
        };
        let config = BuildConfiguration::production(&paths(), &env, Target::Firefox);
        let opts = config.options();

        assert_eq!(config.mode(), Mode::Production);
        assert_eq!(opts.entries.len(), 6);
        assert!(opts.entries.contains_key("wsmwu"));
        assert_eq!(config.output_dir(), Path::new("/ext/_build/_dev"));
        assert_eq!(opts.filename_template, "js/[name].bundle.js");
        assert_eq!(opts.chunk_filename_template, "js/[name].chunk.js");
        assert_eq!(opts.image_inline_limit, 4096);
        assert_eq!(opts.html_pages[0].filename, "save.html");
        assert!(opts.devtool.is_none());
        assert!(opts.watch_ignore.is_none());
    }

    #[test]
    fn test_development_configuration() {
        let paths = paths();
        let urls = Urls {
            local: "http://localhost:3000/".to_string(),
            lan: Some("http://192.168.1.4:3000/".to_string()),
        };
        let watch = WatchPolicy::new(&paths.src);
        let config = BuildConfiguration::development(
            &paths,
            &ProcessEnv::default(),
            Target::Chrome,
            &urls,
            &watch,
        );
        let opts = config.options();

        assert_eq!(config.mode(), Mode::Development);
        assert_eq!(config.target(), Target::Chrome);
        let names: Vec<_> = opts.entries.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["background", "frame"]);
        assert_eq!(opts.devtool.as_deref(), Some("cheap-module-source-map"));
        assert_eq!(opts.live_reload.len(), 2);
        assert!(opts.watch_ignore.as_deref().unwrap().contains("node_modules"));
        assert_eq!(opts.image_inline_limit, 10_000);
    }

    #[test]
    fn test_serializes_camel_case() {
        let config =
            BuildConfiguration::production(&paths(), &ProcessEnv::default(), Target::Firefox);
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();

        assert_eq!(json["mode"], "production");
        assert_eq!(json["target"], "firefox");
        assert_eq!(json["outputDir"], "/ext/_build/_dev");
        assert_eq!(json["imageInlineLimit"], 10_000);
        assert_eq!(json["htmlPages"][0]["chunks"][0], "save");
        assert!(json.get("devtool").is_none());
    }
}
