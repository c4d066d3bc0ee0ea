//! Process-wide environment switches.
//!
//! Read exactly once (in the command layer) and passed down as a value, so the
//! pipeline and the dev-server bootstrap are pure functions of their inputs.

use std::collections::HashMap;

/// Default dev-server port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default dev-server host (all interfaces).
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default size, in bytes, under which images are inlined as data URLs.
pub const DEFAULT_IMAGE_INLINE_SIZE_LIMIT: u64 = 10_000;

/// Recognized environment variables, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnv {
    /// `CI`: treat compiler warnings as errors
    pub strict_warnings: bool,
    /// `PORT`: desired dev-server port
    pub port: u16,
    /// `HOST`: dev-server bind host
    pub host: String,
    /// `HTTPS`: advertise `https` URLs
    pub https: bool,
    /// `IMAGE_INLINE_SIZE_LIMIT`: byte threshold for inlining images
    pub image_inline_size_limit: u64,
}

impl Default for ProcessEnv {
    fn default() -> Self {
        Self {
            strict_warnings: false,
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            https: false,
            image_inline_size_limit: DEFAULT_IMAGE_INLINE_SIZE_LIMIT,
        }
    }
}

impl ProcessEnv {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit `(name, value)` pairs.
    ///
    /// Unparseable numbers fall back to their defaults with a warning.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |name: &str| vars.get(name).map(String::as_str);

        let port = match get("PORT") {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    tracing::warn!(value = raw, "Ignoring invalid PORT, using {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
        };

        let image_inline_size_limit = match get("IMAGE_INLINE_SIZE_LIMIT") {
            None | Some("") => DEFAULT_IMAGE_INLINE_SIZE_LIMIT,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = raw,
                    "Ignoring invalid IMAGE_INLINE_SIZE_LIMIT, using {}",
                    DEFAULT_IMAGE_INLINE_SIZE_LIMIT
                );
                DEFAULT_IMAGE_INLINE_SIZE_LIMIT
            }),
        };

        Self {
            strict_warnings: is_strict_warnings(get("CI")),
            port,
            host: get("HOST")
                .filter(|h| !h.is_empty())
                .unwrap_or(DEFAULT_HOST)
                .to_string(),
            https: get("HTTPS") == Some("true"),
            image_inline_size_limit,
        }
    }

    /// URL scheme advertised by the dev server.
    pub fn protocol(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }
}

/// Interpret the `CI` variable.
///
/// Unset or empty is off. Any other value is on, except `false` in any case.
pub fn is_strict_warnings(value: Option<&str>) -> bool {
    match value {
        None | Some("") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}
