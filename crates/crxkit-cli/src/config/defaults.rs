use std::path::PathBuf;

pub fn default_staging_dir() -> PathBuf {
    PathBuf::from("_build/_dev")
}

pub fn default_output_root() -> PathBuf {
    PathBuf::from("_build")
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_compiler_command() -> String {
    "npx".to_string()
}

pub fn default_compiler_args() -> Vec<String> {
    vec!["webpack".to_string(), "--json".to_string()]
}
