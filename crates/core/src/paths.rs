use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use crate::types::ExportTarget;

/// Directory exports go to when the caller does not name a file
pub fn get_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dynamocards")
}

/// Stable file stem for a video reference, so repeated exports of one video overwrite each other
pub fn export_stem(reference: &str) -> String {
    let mut hasher = DefaultHasher::new();
    reference.trim().hash(&mut hasher);
    format!("flashcards_{:016x}", hasher.finish())
}

pub fn get_export_path(dir: &Path, reference: &str, target: ExportTarget) -> PathBuf {
    dir.join(format!(
        "{}.{}",
        export_stem(reference),
        target.default_extension()
    ))
}
