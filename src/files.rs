//! Managed text files and directory listings.
//!
//! Only `.txt` files are managed: they are the only files the controller
//! writes, renames or deletes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extension of files produced and managed by the controller.
pub const MANAGED_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Name,
    Date,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "date" => Ok(SortOrder::Date),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// One row of the directory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// Whether `path` has the managed text-file extension.
pub fn is_managed_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(MANAGED_EXTENSION))
        .unwrap_or(false)
}

/// `<directory>/<file_name>.txt`
pub fn target_path(directory: &Path, file_name: &str) -> PathBuf {
    directory.join(format!("{}.{}", file_name, MANAGED_EXTENSION))
}

/// List the immediate children of `directory`.
///
/// Directories come first; within each group entries follow `order`
/// (case-insensitive name, or newest modification first).
pub async fn list_directory(
    directory: &Path,
    order: SortOrder,
) -> std::io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut reader = tokio::fs::read_dir(directory).await?;

    while let Some(entry) = reader.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                continue;
            }
        };

        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path(),
            is_dir: metadata.is_dir(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir.cmp(&a.is_dir).then_with(|| match order {
            SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::Date => b.modified.cmp(&a.modified),
        })
    });

    Ok(entries)
}

/// Read a file for the viewer. Non-text files yield an empty string.
pub async fn read_text_file(path: &Path) -> std::io::Result<String> {
    if !is_managed_text_file(path) {
        return Ok(String::new());
    }
    tokio::fs::read_to_string(path).await
}

/// Write `contents` to `path`, replacing any existing file.
///
/// Writes a temp sibling first and renames it over the target, so a failed
/// write leaves an existing file untouched.
pub async fn write_text_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension(format!(
        "{}.{}.tmp",
        MANAGED_EXTENSION,
        uuid::Uuid::new_v4().simple()
    ));

    if let Err(e) = tokio::fs::write(&temp_path, contents).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    Ok(())
}

/// True when `name` is a single path component, with no separators or `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    Path::new(name).file_name() == Some(std::ffi::OsStr::new(name))
}

/// Normalize a rename request into a managed file name.
///
/// Returns `None` for a blank name. `.txt` is appended when missing.
pub fn managed_file_name(new_name: &str) -> Option<String> {
    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_managed_text_file(Path::new(trimmed)) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}.{}", trimmed, MANAGED_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognizes_managed_extension() {
        assert!(is_managed_text_file(Path::new("/tmp/a.txt")));
        assert!(is_managed_text_file(Path::new("notes.TXT")));
        assert!(!is_managed_text_file(Path::new("image.png")));
        assert!(!is_managed_text_file(Path::new("txt")));
    }

    #[test]
    fn target_path_appends_extension() {
        let path = target_path(Path::new("/out"), "IMG 007 final");
        assert_eq!(path, PathBuf::from("/out/IMG 007 final.txt"));
    }

    #[test]
    fn managed_file_name_normalizes() {
        assert_eq!(managed_file_name("  chapter  "), Some("chapter.txt".to_string()));
        assert_eq!(managed_file_name("chapter.txt"), Some("chapter.txt".to_string()));
        assert_eq!(managed_file_name("   "), None);
    }

    #[test]
    fn plain_file_names_have_one_component() {
        assert!(is_plain_file_name("chapter one.txt"));
        assert!(is_plain_file_name("...txt"));
        assert!(!is_plain_file_name("../escaped.txt"));
        assert!(!is_plain_file_name("nested/inner.txt"));
        assert!(!is_plain_file_name("/abs.txt"));
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("Date".parse::<SortOrder>(), Ok(SortOrder::Date));
        assert_eq!(" name ".parse::<SortOrder>(), Ok(SortOrder::Name));
        assert!("size".parse::<SortOrder>().is_err());
    }

    #[tokio::test]
    async fn lists_directories_first_then_by_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("A.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();

        let entries = list_directory(dir.path(), SortOrder::Name).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "A.txt", "b.txt"]);
        assert!(entries[0].is_dir);
    }

    #[tokio::test]
    async fn write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();

        write_text_file(&path, "new\ncontent").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\ncontent");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_leaves_similarly_named_files_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let neighbour = dir.path().join("out.txt.tmp");
        std::fs::write(&neighbour, "keep me").unwrap();

        write_text_file(&path, "saved").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "saved");
        assert_eq!(std::fs::read_to_string(&neighbour).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(write_text_file(&path, "x").await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn viewer_skips_non_text_files() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("pic.png");
        std::fs::write(&png, [0u8, 1, 2]).unwrap();
        assert_eq!(read_text_file(&png).await.unwrap(), "");

        let txt = dir.path().join("a.txt");
        std::fs::write(&txt, "hello").unwrap();
        assert_eq!(read_text_file(&txt).await.unwrap(), "hello");
    }
}
