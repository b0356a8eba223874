//! Central project identity contract.
//!
//! Single source of truth for runtime identity values.

pub const DISPLAY_NAME: &str = "Labenv";
pub const BINARY_NAME: &str = "labenv";
pub const ENV_PREFIX: &str = "LABENV";
pub const RECORD_FILE_BASENAME: &str = "labenv.kdl";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

/// Render a CLI invocation for user-facing hints, e.g. `cli_with("sync --doc numpy")`.
pub fn cli_with(rest: &str) -> String {
    format!("{} {}", BINARY_NAME, rest)
}
