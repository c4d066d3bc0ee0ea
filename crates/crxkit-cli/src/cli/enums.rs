use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser the extension is packaged for
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Mozilla Firefox (WebExtensions)
    ///
    /// The deployable package is written to `_build/firefox`.
    #[value(name = "firefox")]
    Firefox,

    /// Google Chrome and other Chromium browsers
    ///
    /// The deployable package is written to `_build/chrome`.
    #[value(name = "chrome")]
    Chrome,
}

impl Target {
    /// Lowercase name, used for the output directory and the `PROJECT` variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Firefox => "firefox",
            Target::Chrome => "chrome",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
