use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Receipt output directory from `config::certificates_dir()`.
/// Relative values resolve against current_dir().
pub fn certificates_dir() -> PathBuf {
    let p = PathBuf::from(config::certificates_dir());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// `{dir}/receipt_{payment_id}.html`
pub fn receipt_path_in(dir: &Path, payment_id: i64) -> PathBuf {
    dir.join(format!("receipt_{payment_id}.html"))
}
