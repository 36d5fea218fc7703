//! Go package file lookup.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;

const GO_SUFFIX: &str = ".go";
const TEST_SUFFIX: &str = "_test.go";

/// Package lookup errors.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The directory could not be listed.
    #[error("failed to read package directory {dir}: {source}")]
    ReadDir {
        dir: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory contains no Go files.
    #[error("no Go files in {0}")]
    NoGoFiles(Utf8PathBuf),
}

/// Source files of one Go package, as base names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFiles {
    /// Non-test Go files.
    pub go_files: Vec<String>,
    /// `_test.go` files.
    pub test_go_files: Vec<String>,
}

/// Lists the files that make up the package in a directory.
pub trait PackageLookup {
    fn package_files(&self, dir: &Utf8Path) -> Result<PackageFiles, LookupError>;
}

/// Lists `*.go` files directly in the directory.
///
/// Files starting with `.` or `_` are skipped, as the go tool does. Build
/// constraints are not evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLookup;

impl PackageLookup for DirectoryLookup {
    fn package_files(&self, dir: &Utf8Path) -> Result<PackageFiles, LookupError> {
        let read_err = |source| LookupError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        };

        let mut files = PackageFiles::default();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if !entry.file_type().map_err(read_err)?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.ends_with(GO_SUFFIX) || name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            if name.ends_with(TEST_SUFFIX) {
                files.test_go_files.push(name);
            } else {
                files.go_files.push(name);
            }
        }

        if files.go_files.is_empty() && files.test_go_files.is_empty() {
            return Err(LookupError::NoGoFiles(dir.to_path_buf()));
        }

        files.go_files.sort();
        files.test_go_files.sort();
        Ok(files)
    }
}

/// Returns true if `file` is a Go test file.
pub fn is_test_file(file: &str) -> bool {
    file.ends_with(TEST_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).unwrap()
    }

    #[test]
    fn test_lists_package_files() {
        let temp = tempfile::tempdir().unwrap();
        for name in [
            "main.go",
            "util.go",
            "flymake_main.go",
            "main_test.go",
            "_ignored.go",
            ".hidden.go",
            "README.md",
        ] {
            fs::write(temp.path().join(name), "package main\n").unwrap();
        }
        fs::create_dir(temp.path().join("sub.go")).unwrap();

        let files = DirectoryLookup.package_files(utf8(temp.path())).unwrap();
        assert_eq!(
            files,
            PackageFiles {
                go_files: vec![
                    "flymake_main.go".to_string(),
                    "main.go".to_string(),
                    "util.go".to_string(),
                ],
                test_go_files: vec!["main_test.go".to_string()],
            }
        );
    }

    #[test]
    fn test_no_go_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let err = DirectoryLookup.package_files(utf8(temp.path())).unwrap_err();
        assert!(matches!(err, LookupError::NoGoFiles(_)));
    }

    #[test]
    fn test_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("gone");

        let err = DirectoryLookup.package_files(utf8(&missing)).unwrap_err();
        assert!(matches!(err, LookupError::ReadDir { .. }));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_is_test_file() {
        assert!(is_test_file("pkg/foo_test.go"));
        assert!(!is_test_file("pkg/foo.go"));
        assert!(!is_test_file("test.go"));
    }
}
