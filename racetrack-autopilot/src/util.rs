use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Regular files in `dir` with the given extension, sorted by path.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed listing {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed listing {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Uses `raw` as given when it exists, otherwise looks for it (with and
/// without a `.txt` suffix) under `dir`.
pub fn resolve_in_dir(raw: &str, dir: &Path) -> PathBuf {
    let given = PathBuf::from(raw);
    if given.exists() {
        return given;
    }
    let joined = dir.join(raw);
    if joined.exists() || joined.extension().is_some() {
        return joined;
    }
    let with_txt = dir.join(format!("{raw}.txt"));
    if with_txt.exists() {
        with_txt
    } else {
        joined
    }
}

/// File stem used to name tracks in reports.
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = list_files(dir.path(), "txt").unwrap();
        let names: Vec<String> = files.iter().map(|p| file_label(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_files(&dir.path().join("nope"), "txt").unwrap_err();
        assert!(err.to_string().contains("failed listing"));
    }

    #[test]
    fn resolves_bare_names_against_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("oval.txt"), "").unwrap();
        assert_eq!(resolve_in_dir("oval", dir.path()), dir.path().join("oval.txt"));
        assert_eq!(resolve_in_dir("oval.txt", dir.path()), dir.path().join("oval.txt"));
        assert_eq!(resolve_in_dir("other.txt", dir.path()), dir.path().join("other.txt"));
    }

    #[test]
    fn write_text_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/er/file.txt");
        write_text(&path, "hello\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello\n");
    }
}
