//! Packaged manifest generation.
//!
//! The extension manifest is authored as YAML (`src/manifest.yml`) and shipped
//! as `manifest.json`, indented with four spaces.

use crate::error::ManifestError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the packaged manifest inside an output directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// A `manifest.json` on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenManifest {
    pub path: PathBuf,
    /// Size of the serialized JSON
    pub bytes: u64,
}

/// A manifest loaded from its declarative source.
///
/// Identical input always serializes to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ManifestDocument(Map<String, Value>);

impl ManifestDocument {
    /// Parse a manifest source document.
    ///
    /// The top level must be a mapping.
    pub fn load(source: &Path) -> Result<Self, ManifestError> {
        let text = match fs::read_to_string(source) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::SourceNotFound(source.to_path_buf()))
            }
            Err(e) => {
                return Err(ManifestError::Parse {
                    path: source.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let fields: Map<String, Value> =
            serde_saphyr::from_str(&text).map_err(|e| ManifestError::Parse {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self(fields))
    }

    /// Serialize as 4-space indented JSON with a trailing newline.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write `manifest.json` at the root of `out_dir`.
    ///
    /// The directory must already exist.
    pub fn write_to(&self, out_dir: &Path) -> Result<WrittenManifest, ManifestError> {
        let path = out_dir.join(MANIFEST_FILE_NAME);
        let write = |path: &Path| -> std::io::Result<u64> {
            let json = self.to_json_string().map_err(std::io::Error::from)?;
            fs::write(path, &json)?;
            Ok(json.len() as u64)
        };
        let bytes = write(&path).map_err(|source| ManifestError::WriteFailure {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes, "Wrote manifest");
        Ok(WrittenManifest { path, bytes })
    }
}

/// Load `source` and write it as `manifest.json` into `out_dir`.
pub fn generate(source: &Path, out_dir: &Path) -> Result<WrittenManifest, ManifestError> {
    ManifestDocument::load(source)?.write_to(out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SOURCE: &str = r#"
manifest_version: 2
name: Pocket
version: "3.0.1"
permissions:
  - tabs
  - contextMenus
background:
  scripts:
    - js/background.bundle.js
browser_action:
  default_title: Save to Pocket
  default_icon:
    "19": images/icon-19.png
"#;

    #[test]
    fn test_generate_round_trip() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("manifest.yml");
        fs::write(&source, SOURCE).unwrap();

        let written = generate(&source, temp.path()).unwrap();
        assert_eq!(written.path, temp.path().join(MANIFEST_FILE_NAME));

        let text = fs::read_to_string(&written.path).unwrap();
        assert_eq!(written.bytes, text.len() as u64);

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({
                "manifest_version": 2,
                "name": "Pocket",
                "version": "3.0.1",
                "permissions": ["tabs", "contextMenus"],
                "background": { "scripts": ["js/background.bundle.js"] },
                "browser_action": {
                    "default_title": "Save to Pocket",
                    "default_icon": { "19": "images/icon-19.png" }
                }
            })
        );
    }

    #[test]
    fn test_four_space_indent() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("manifest.yml");
        fs::write(&source, "background:\n  persistent: false\nname: x\n").unwrap();

        let doc = ManifestDocument::load(&source).unwrap();
        assert_eq!(
            doc.to_json_string().unwrap(),
            "{\n    \"background\": {\n        \"persistent\": false\n    },\n    \"name\": \"x\"\n}\n"
        );
    }

    #[test]
    fn test_deterministic_output() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("manifest.yml");
        fs::write(&source, SOURCE).unwrap();

        let a = ManifestDocument::load(&source).unwrap().to_json_string().unwrap();
        let b = ManifestDocument::load(&source).unwrap().to_json_string().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = generate(&temp.path().join("nope.yml"), temp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::SourceNotFound(_)));
    }

    #[test]
    fn test_non_mapping_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("manifest.yml");
        fs::write(&source, "- just\n- a list\n").unwrap();

        let err = ManifestDocument::load(&source).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn test_unwritable_output() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("manifest.yml");
        fs::write(&source, "name: x\n").unwrap();

        let err = generate(&source, &temp.path().join("missing/dir")).unwrap_err();
        assert!(matches!(err, ManifestError::WriteFailure { .. }));
    }
}
