//! Mapping directory resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the mappings directory.
pub const MAPPINGS_ENV_VAR: &str = "COSREG_MAPPINGS_DIR";

/// Get the mappings directory.
///
/// Resolution order:
/// 1. `explicit` (the `--mappings` flag)
/// 2. `COSREG_MAPPINGS_DIR` environment variable
/// 3. `mappings/` directory relative to workspace root
pub fn mappings_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(root) = std::env::var(MAPPINGS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../mappings")
}
