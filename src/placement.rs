/// Destination planning for classified files.
///
/// A `Placement` ties a discovered file to the directory it belongs in:
/// `destination_root / CATEGORY / BUCKET`. Planning is pure path
/// construction; nothing here touches the filesystem.
use crate::file_category::{Category, bucket_for};
use crate::scanner::Candidate;
use std::path::{Path, PathBuf};

/// A planned destination for a single candidate file.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Where the file currently lives.
    pub source: PathBuf,
    /// The file's basename, kept for destination path construction.
    pub file_name: String,
    /// The category the file was classified into.
    pub category: Category,
    /// The first-letter bucket within the category.
    pub bucket: String,
    /// The directory the file will be moved or copied into.
    pub destination_dir: PathBuf,
}

impl Placement {
    /// Plans the destination for a candidate under the given root.
    ///
    /// # Examples
    ///
    /// ```
    /// use retrosort::file_category::Category;
    /// use retrosort::placement::Placement;
    /// use retrosort::scanner::Candidate;
    /// use std::path::{Path, PathBuf};
    ///
    /// let candidate = Candidate {
    ///     path: PathBuf::from("/incoming/giana.d64"),
    ///     file_name: "giana.d64".to_string(),
    /// };
    /// let placement = Placement::plan(Path::new("/sorted"), Category::D64, candidate);
    /// assert_eq!(placement.destination_dir, Path::new("/sorted/D64/G"));
    /// assert_eq!(placement.destination_file(), Path::new("/sorted/D64/G/giana.d64"));
    /// ```
    pub fn plan(destination_root: &Path, category: Category, candidate: Candidate) -> Self {
        let bucket = bucket_for(&candidate.file_name);
        let destination_dir = destination_root.join(category.dir_name()).join(&bucket);
        Self {
            source: candidate.path,
            file_name: candidate.file_name,
            category,
            bucket,
            destination_dir,
        }
    }

    /// Returns the full destination file path.
    pub fn destination_file(&self) -> PathBuf {
        self.destination_dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str, name: &str) -> Candidate {
        Candidate {
            path: PathBuf::from(path),
            file_name: name.to_string(),
        }
    }

    #[test]
    fn test_plan_letter_bucket() {
        let placement = Placement::plan(
            Path::new("/dest"),
            Category::Prg,
            candidate("/src/game.prg", "game.prg"),
        );
        assert_eq!(placement.bucket, "G");
        assert_eq!(placement.destination_dir, Path::new("/dest/PRG/G"));
        assert_eq!(
            placement.destination_file(),
            Path::new("/dest/PRG/G/game.prg")
        );
    }

    #[test]
    fn test_plan_fallback_bucket() {
        let placement = Placement::plan(
            Path::new("/dest"),
            Category::T64,
            candidate("/src/7zip.t64", "7zip.t64"),
        );
        assert_eq!(placement.bucket, "0_9");
        assert_eq!(placement.destination_dir, Path::new("/dest/T64/0_9"));
    }

    #[test]
    fn test_plan_uppercases_bucket() {
        let placement = Placement::plan(
            Path::new("/dest"),
            Category::D64,
            candidate("/src/demo.d64", "demo.d64"),
        );
        assert_eq!(placement.bucket, "D");
    }

    #[test]
    fn test_plan_keeps_source_path() {
        let placement = Placement::plan(
            Path::new("/dest"),
            Category::Crt,
            candidate("/src/deep/nested/turrican.crt", "turrican.crt"),
        );
        assert_eq!(placement.source, Path::new("/src/deep/nested/turrican.crt"));
    }
}
