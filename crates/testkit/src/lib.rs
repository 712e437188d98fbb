#![warn(missing_docs)]
//! Deterministic testing surfaces for layout code: golden snapshots and
//! step-by-step bind scenarios.

mod scenario;
mod snapshot;

use std::path::{Path, PathBuf};

pub use scenario::*;
pub use snapshot::*;

/// Path of a golden file under `<manifest_dir>/tests/golden/`.
///
/// Pass `env!("CARGO_MANIFEST_DIR")` from the calling test crate.
pub fn golden_path(manifest_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    manifest_dir.as_ref().join("tests").join("golden").join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_path_is_under_tests() {
        let path = golden_path("/work/crate", "hud.json");
        assert_eq!(path, PathBuf::from("/work/crate/tests/golden/hud.json"));
    }
}
