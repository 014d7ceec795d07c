//! Test support utilities for publisher behavioural tests.

use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory and returns it with its UTF-8 path.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub fn temp_root() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("temp dir path not UTF-8");
    (temp, root)
}
