/// Source-tree traversal.
///
/// Walks the source directory once per category and collects the files whose
/// names match that category's pattern. Recursive mode descends without a
/// depth limit; non-recursive mode looks at the source root's own listing
/// only. Entries are sorted by file name so reports are deterministic.
use crate::file_category::{Category, CategoryMatcher};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file discovered during traversal, before planning.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Full path to the file.
    pub path: PathBuf,
    /// The file's basename.
    pub file_name: String,
}

/// Collects the candidates for one category under `root`.
///
/// Unreadable directory entries are reported to stderr and skipped; a file
/// that cannot be listed is not worth aborting the category scan for.
pub fn scan_category(
    root: &Path,
    category: Category,
    matcher: &CategoryMatcher,
    recursive: bool,
) -> io::Result<Vec<Candidate>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory not found: {}", root.display()),
        ));
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("Warning: could not read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if matcher.matches(category, &file_name) {
            candidates.push(Candidate {
                path: entry.into_path(),
                file_name,
            });
        }
    }

    Ok(candidates)
}
