use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Read a note and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

/// Every folder under the notes root as a relative path, sorted.
///
/// Hidden folders (`.obsidian`, `.git`, ...) and their contents are skipped.
pub fn list_folders(notes_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut folders = Vec::new();
    scan_folders_recursive(notes_root, notes_root, &mut folders)?;
    folders.sort();
    Ok(folders)
}

/// Folders whose path contains `query`, ignoring case. An empty query keeps all.
pub fn suggest_folders<'a>(folders: &'a [RelativePathBuf], query: &str) -> Vec<&'a RelativePath> {
    let query = query.trim().to_lowercase();
    folders
        .iter()
        .filter(|folder| folder.as_str().to_lowercase().contains(&query))
        .map(|folder| folder.as_relative_path())
        .collect()
}

fn scan_folders_recursive(
    notes_root: &Path,
    dir: &Path,
    folders: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() || is_hidden(&path) {
            continue;
        }

        let relative = path
            .strip_prefix(notes_root)
            .ok()
            .and_then(|p| RelativePathBuf::from_path(p).ok())
            .ok_or_else(|| IoError::NonUtf8Path(path.clone()))?;
        folders.push(relative);
        scan_folders_recursive(notes_root, &path, folders)?;
    }

    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
