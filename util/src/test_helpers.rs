use crate::config::AppConfig;
use tempfile::TempDir;

/// Creates a temporary directory and points `CERTIFICATES_DIR` at it.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_certificates_dir() -> TempDir {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let abs = tmp
        .path()
        .canonicalize()
        .unwrap_or_else(|_| tmp.path().to_path_buf());
    AppConfig::set_certificates_dir(abs.to_string_lossy());
    tmp
}
