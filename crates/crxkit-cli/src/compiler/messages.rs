//! Bundler message cleanup.
//!
//! Loader output is noisy: repeated prefixes, stack-ish headers, the same
//! error reported once per entry. These helpers turn it into something worth
//! printing.

use super::Diagnostics;
use regex::Regex;
use std::sync::LazyLock;

const SYNTAX_ERROR_LABEL: &str = "Syntax error:";
const BLANK_ERROR: &str = "Unknown error";
const BLANK_WARNING: &str = "Unknown warning";

static BUILD_FAILED_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^Module build failed(?: \(from [^)]*\))?:\s*(?:Error:\s*)?").ok());

static SYNTAX_ERROR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"SyntaxError\s*:?\s*").ok());

static BLANK_RUNS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n{3,}").ok());

/// Clean up one message.
pub fn format_message(message: &str) -> String {
    let mut text = message.replace("\r\n", "\n");

    if let Some(re) = BUILD_FAILED_PREFIX.as_ref() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = SYNTAX_ERROR.as_ref() {
        text = re
            .replace_all(&text, format!("{} ", SYNTAX_ERROR_LABEL).as_str())
            .into_owned();
    }
    if let Some(re) = BLANK_RUNS.as_ref() {
        text = re.replace_all(&text, "\n\n").into_owned();
    }

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn is_likely_syntax_error(message: &str) -> bool {
    message.contains(SYNTAX_ERROR_LABEL)
}

/// A message that cleans up to nothing is reported as `blank`, so a
/// non-empty list never comes out empty.
fn clean_all(messages: &[String], blank: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(messages.len());
    for message in messages {
        let mut formatted = format_message(message);
        if formatted.is_empty() {
            formatted = blank.to_string();
        }
        if !out.contains(&formatted) {
            out.push(formatted);
        }
    }
    out
}

/// Clean up every message.
///
/// Duplicates are dropped. When any error looks like a syntax error, only
/// syntax errors are kept since the rest are usually knock-on failures.
pub fn format_messages(diagnostics: &Diagnostics) -> Diagnostics {
    let mut errors = clean_all(&diagnostics.errors, BLANK_ERROR);
    if errors.iter().any(|e| is_likely_syntax_error(e)) {
        errors.retain(|e| is_likely_syntax_error(e));
    }

    Diagnostics {
        errors,
        warnings: clean_all(&diagnostics.warnings, BLANK_WARNING),
    }
}
