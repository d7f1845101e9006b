//! Small helpers shared across modules.

use directories::UserDirs;
use std::path::{Path, PathBuf};

/// The user's Downloads folder, else Documents, else the current directory.
pub fn default_download_folder() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| {
            dirs.download_dir()
                .filter(|p| p.is_dir())
                .or_else(|| dirs.document_dir())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
