/// Undo functionality for reverting a previous organization run.
///
/// Real move runs record every relocation in a history file inside the
/// destination root. Undo replays that history in reverse, moving each file
/// back to where it came from.
use crate::file_organizer::{Operation, OperationLog, OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the result of an undo run.
#[derive(Debug)]
pub struct UndoReport {
    /// Number of files successfully restored.
    pub restored_files: usize,
    /// Files that could not be restored, with the reason.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Files that were skipped because they were no longer where the
    /// history said they would be.
    pub skipped_files: Vec<(PathBuf, String)>,
}

impl UndoReport {
    fn new() -> Self {
        Self {
            restored_files: 0,
            failed_restores: Vec::new(),
            skipped_files: Vec::new(),
        }
    }

    /// Returns true if every recorded operation was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }
}

/// Outcome of restoring a single recorded move.
enum RestoreOutcome {
    Restored,
    Missing(PathBuf),
    Failed(PathBuf, String),
}

/// Manages undo of recorded move runs.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent run recorded under `destination_root`.
    ///
    /// Loads the history file, moves every recorded file back to its
    /// original location in reverse order, and deletes the history only
    /// when everything was restored.
    ///
    /// # Edge cases handled
    ///
    /// * **File not found**: skipped with a note; something else already
    ///   moved or deleted it.
    /// * **Original path occupied**: the conflicting file is backed up with
    ///   a timestamp suffix before the restore.
    /// * **Missing history**: returns an error, nothing to undo.
    pub fn undo(destination_root: &Path) -> OrganizeResult<UndoReport> {
        let log = OperationLog::load(destination_root)?;
        let log = log.ok_or_else(|| OrganizeError::InvalidHistoryFormat {
            reason: "No previous organization found to undo".to_string(),
        })?;

        // Restore in reverse order (undo is LIFO)
        let mut report = UndoReport::new();
        for operation in log.operations.iter().rev() {
            match Self::restore_file(operation) {
                RestoreOutcome::Restored => report.restored_files += 1,
                RestoreOutcome::Missing(path) => report
                    .skipped_files
                    .push((path, "File not found at expected location".to_string())),
                RestoreOutcome::Failed(path, reason) => {
                    report.failed_restores.push((path, reason));
                }
            }
        }

        // Only delete history if undo was fully successful
        if report.is_complete_success()
            && let Err(e) = OperationLog::delete(destination_root)
        {
            eprintln!("Warning: Could not delete history file: {}", e);
        }

        Ok(report)
    }

    /// Restores a single file to its original location, backing up any file
    /// that now occupies that location.
    fn restore_file(operation: &Operation) -> RestoreOutcome {
        if !operation.new_path.exists() {
            return RestoreOutcome::Missing(operation.new_path.clone());
        }

        if operation.original_path.exists() {
            let backup_path = Self::generate_backup_path(&operation.original_path);
            if let Err(e) = fs::rename(&operation.original_path, &backup_path) {
                return RestoreOutcome::Failed(
                    operation.original_path.clone(),
                    format!("Could not backup conflicting file: {}", e),
                );
            }
        }

        if let Some(parent) = operation.original_path.parent()
            && !parent.exists()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return RestoreOutcome::Failed(
                operation.original_path.clone(),
                format!("Could not recreate original directory: {}", e),
            );
        }

        match fs::rename(&operation.new_path, &operation.original_path) {
            Ok(()) => RestoreOutcome::Restored,
            Err(e) => RestoreOutcome::Failed(
                operation.new_path.clone(),
                format!("Failed to restore file: {}", e),
            ),
        }
    }

    /// Generates a backup path by appending a timestamp.
    ///
    /// Example: `game.prg` becomes `game.prg.bak.20260830-143052`
    fn generate_backup_path(original_path: &Path) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let filename = original_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        let backup_name = format!("{}.bak.{}", filename, timestamp);

        if let Some(parent) = original_path.parent() {
            parent.join(backup_name)
        } else {
            PathBuf::from(backup_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;
    use crate::file_organizer::{FileOrganizer, Outcome};
    use crate::placement::Placement;
    use crate::scanner::Candidate;
    use std::fs;
    use tempfile::TempDir;

    fn move_one(source: &Path, destination_root: &Path, category: Category) -> Operation {
        let file_name = source
            .file_name()
            .expect("test file has a name")
            .to_string_lossy()
            .to_string();
        let plan = Placement::plan(
            destination_root,
            category,
            Candidate {
                path: source.to_path_buf(),
                file_name,
            },
        );
        let organizer = FileOrganizer::new(false, false);
        match organizer
            .move_file(&plan, &mut |_: &Path| true)
            .expect("Failed to move file")
        {
            Outcome::Moved(op) => op,
            other => panic!("Expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_undo_no_history() {
        let dest_dir = TempDir::new().expect("Failed to create temp directory");
        let result = UndoManager::undo(dest_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_undo_single_file() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file_path = source_dir.path().join("game.prg");
        fs::write(&file_path, "prg content").expect("Failed to write test file");

        let operation = move_one(&file_path, dest_dir.path(), Category::Prg);

        let mut log = OperationLog::new(
            source_dir.path().to_path_buf(),
            dest_dir.path().to_path_buf(),
        );
        log.add_operation(operation);
        log.save(dest_dir.path()).expect("Failed to save history");

        let moved = dest_dir.path().join("PRG").join("G").join("game.prg");
        assert!(!file_path.exists());
        assert!(moved.exists());

        let report = UndoManager::undo(dest_dir.path()).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert!(report.is_complete_success());
        assert!(file_path.exists());
        assert!(!moved.exists());
        assert!(!dest_dir.path().join(".retrosort_history.json").exists());
    }

    #[test]
    fn test_undo_multiple_files_reversed() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file1 = source_dir.path().join("giana.d64");
        let file2 = source_dir.path().join("turrican.crt");
        fs::write(&file1, "d64 data").expect("Failed to write file1");
        fs::write(&file2, "crt data").expect("Failed to write file2");

        let op1 = move_one(&file1, dest_dir.path(), Category::D64);
        let op2 = move_one(&file2, dest_dir.path(), Category::Crt);

        let mut log = OperationLog::new(
            source_dir.path().to_path_buf(),
            dest_dir.path().to_path_buf(),
        );
        log.add_operation(op1);
        log.add_operation(op2);
        log.save(dest_dir.path()).expect("Failed to save history");

        let report = UndoManager::undo(dest_dir.path()).expect("Undo failed");

        assert_eq!(report.restored_files, 2);
        assert!(report.is_complete_success());
        assert!(file1.exists());
        assert!(file2.exists());
    }

    #[test]
    fn test_undo_backs_up_conflicting_file() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file_path = source_dir.path().join("game.prg");
        fs::write(&file_path, "original content").expect("Failed to write test file");

        let operation = move_one(&file_path, dest_dir.path(), Category::Prg);

        let mut log = OperationLog::new(
            source_dir.path().to_path_buf(),
            dest_dir.path().to_path_buf(),
        );
        log.add_operation(operation);
        log.save(dest_dir.path()).expect("Failed to save history");

        // A new file appeared at the original location in the meantime
        fs::write(&file_path, "new content").expect("Failed to create conflict");

        let report = UndoManager::undo(dest_dir.path()).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert_eq!(report.failed_restores.len(), 0);

        let restored = fs::read_to_string(&file_path).expect("Failed to read restored file");
        assert_eq!(restored, "original content");

        let backups: Vec<_> = fs::read_dir(source_dir.path())
            .expect("Failed to read source directory")
            .filter_map(|e| {
                e.ok().and_then(|entry| {
                    let path = entry.path();
                    if path.file_name()?.to_string_lossy().contains(".bak.") {
                        Some(path)
                    } else {
                        None
                    }
                })
            })
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_undo_skips_missing_file() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let operation = Operation {
            original_path: source_dir.path().join("vanished.d64"),
            new_path: dest_dir.path().join("D64").join("V").join("vanished.d64"),
            category: "D64".to_string(),
        };

        let mut log = OperationLog::new(
            source_dir.path().to_path_buf(),
            dest_dir.path().to_path_buf(),
        );
        log.add_operation(operation);
        log.save(dest_dir.path()).expect("Failed to save history");

        let report = UndoManager::undo(dest_dir.path()).expect("Undo failed");

        assert_eq!(report.restored_files, 0);
        assert_eq!(report.skipped_files.len(), 1);
        // History is kept so the situation can be inspected
        assert!(dest_dir.path().join(".retrosort_history.json").exists());
    }

    #[test]
    fn test_undo_recreates_missing_source_directory() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let nested = source_dir.path().join("incoming");
        fs::create_dir(&nested).expect("Failed to create subdirectory");
        let file_path = nested.join("demo.d64");
        fs::write(&file_path, "d64 data").expect("Failed to write test file");

        let operation = move_one(&file_path, dest_dir.path(), Category::D64);

        let mut log = OperationLog::new(
            source_dir.path().to_path_buf(),
            dest_dir.path().to_path_buf(),
        );
        log.add_operation(operation);
        log.save(dest_dir.path()).expect("Failed to save history");

        // The original directory disappeared after the run
        fs::remove_dir(&nested).expect("Failed to remove subdirectory");

        let report = UndoManager::undo(dest_dir.path()).expect("Undo failed");
        assert_eq!(report.restored_files, 1);
        assert!(file_path.exists());
    }
}
