/// File organization executor.
///
/// This module performs the actual filesystem mutations of a run: creating
/// destination directories on demand, moving files (with overwrite
/// confirmation) and copying files (overwriting silently). Under dry-run it
/// only reports the intended action. Move operations are recorded so a run
/// can be undone later.
use crate::output::OutputFormatter;
use crate::placement::Placement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Answers overwrite questions during a move.
///
/// The terminal implementation blocks on operator input; tests supply a
/// closure instead to get deterministic answers.
pub trait Confirmer {
    /// Returns true if the existing file at `destination` may be replaced.
    fn confirm_overwrite(&mut self, destination: &Path) -> bool;
}

impl<F: FnMut(&Path) -> bool> Confirmer for F {
    fn confirm_overwrite(&mut self, destination: &Path) -> bool {
        self(destination)
    }
}

/// Asks the operator on stdin/stdout, accepting `y`/`Y` as confirmation.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm_overwrite(&mut self, destination: &Path) -> bool {
        print!("Overwrite {}? (y/n): ", destination.display());
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }
}

/// Represents a single recorded move.
///
/// Only moves are recorded: copies leave the source untouched, so there is
/// nothing destructive to revert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// The path of the file before the move.
    pub original_path: PathBuf,
    /// The path of the file after the move.
    pub new_path: PathBuf,
    /// The category directory the file was moved under.
    pub category: String,
}

/// A complete transaction of move operations, persisted to the destination
/// root to enable undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLog {
    /// ISO 8601 timestamp of when the run happened.
    pub timestamp: String,
    /// The source root the files came from.
    pub source_root: PathBuf,
    /// The destination root the files were organized into.
    pub destination_root: PathBuf,
    /// All moves performed in this run.
    pub operations: Vec<Operation>,
}

impl OperationLog {
    /// Creates an empty log for a run between the given roots.
    pub fn new(source_root: PathBuf, destination_root: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            source_root,
            destination_root,
            operations: Vec::new(),
        }
    }

    /// Adds a recorded move to this log.
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Returns true if no moves were recorded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the path of the history file under a destination root.
    fn history_file_path(destination_root: &Path) -> PathBuf {
        destination_root.join(".retrosort_history.json")
    }

    /// Saves this log to the destination root in JSON format.
    pub fn save(&self, destination_root: &Path) -> OrganizeResult<()> {
        let json_string = serde_json::to_string_pretty(self).map_err(|e| {
            OrganizeError::HistoryWriteFailed {
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            }
        })?;

        let history_path = Self::history_file_path(destination_root);
        fs::write(&history_path, json_string)
            .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;

        Ok(())
    }

    /// Loads the most recent log from a destination root.
    pub fn load(destination_root: &Path) -> OrganizeResult<Option<Self>> {
        let history_path = Self::history_file_path(destination_root);

        if !history_path.exists() {
            return Ok(None);
        }

        let json_string = fs::read_to_string(&history_path)
            .map_err(|e| OrganizeError::HistoryReadFailed { source: e })?;

        let log = serde_json::from_str(&json_string).map_err(|e| {
            OrganizeError::InvalidHistoryFormat {
                reason: format!("JSON parse error: {}", e),
            }
        })?;

        Ok(Some(log))
    }

    /// Deletes the history file under a destination root.
    pub fn delete(destination_root: &Path) -> OrganizeResult<()> {
        let history_path = Self::history_file_path(destination_root);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}

/// Errors that can occur while executing file operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to copy a file to its destination.
    FileCopyFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to write the history file.
    HistoryWriteFailed { source: io::Error },
    /// Failed to read the history file.
    HistoryReadFailed { source: io::Error },
    /// The history file has an invalid format.
    InvalidHistoryFormat { reason: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::FileCopyFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::HistoryWriteFailed { source } => {
                write!(f, "Failed to write history file: {}", source)
            }
            Self::HistoryReadFailed { source } => {
                write!(f, "Failed to read history file: {}", source)
            }
            Self::InvalidHistoryFormat { reason } => {
                write!(f, "Invalid history file format: {}", reason)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened to a single candidate file.
#[derive(Debug)]
pub enum Outcome {
    /// The file was moved; the recorded operation enables undo.
    Moved(Operation),
    /// The file was copied.
    Copied,
    /// The operator declined an overwrite; the source was left in place.
    Skipped,
    /// Dry-run: the action was reported but nothing was touched.
    Simulated,
}

/// Executes move and copy operations for planned placements.
///
/// Holds the run flags explicitly instead of reading process-wide state, so
/// every call site sees the same immutable configuration.
pub struct FileOrganizer {
    dry_run: bool,
    verbose: bool,
}

impl FileOrganizer {
    /// Creates an executor for the given run flags.
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }

    /// Creates `path` (with intermediate parents) unless it already exists.
    ///
    /// Idempotent: an existing directory is not an error. Under dry-run the
    /// creation is only reported, and only when verbose.
    pub fn ensure_directory(&self, path: &Path) -> OrganizeResult<()> {
        if path.exists() {
            return Ok(());
        }

        if self.dry_run {
            if self.verbose {
                OutputFormatter::dry_run_notice(&format!(
                    "Would create directory: {}",
                    path.display()
                ));
            }
            return Ok(());
        }

        fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if self.verbose {
            OutputFormatter::plain(&format!("Created directory: {}", path.display()));
        }
        Ok(())
    }

    /// Moves the placement's source file into its destination directory.
    ///
    /// If the destination file already exists the confirmer is asked;
    /// declining skips the file and leaves the source in place. Under
    /// dry-run the move is reported and nothing is mutated or asked.
    pub fn move_file(
        &self,
        placement: &Placement,
        confirmer: &mut dyn Confirmer,
    ) -> OrganizeResult<Outcome> {
        let destination = placement.destination_file();

        if self.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Simulated move: {} -> {}",
                placement.source.display(),
                placement.destination_dir.display()
            ));
            return Ok(Outcome::Simulated);
        }

        self.ensure_directory(&placement.destination_dir)?;

        if destination.exists() {
            if self.verbose {
                OutputFormatter::warning(&format!("File already exists: {}", destination.display()));
            }
            if !confirmer.confirm_overwrite(&destination) {
                if self.verbose {
                    OutputFormatter::plain(&format!("Skipped: {}", placement.source.display()));
                }
                return Ok(Outcome::Skipped);
            }
            fs::remove_file(&destination).map_err(|e| OrganizeError::FileMoveFailure {
                source: placement.source.clone(),
                destination: destination.clone(),
                source_error: e,
            })?;
        }

        relocate(&placement.source, &destination).map_err(|e| OrganizeError::FileMoveFailure {
            source: placement.source.clone(),
            destination: destination.clone(),
            source_error: e,
        })?;

        if self.verbose {
            OutputFormatter::success(&format!(
                "Moved: {} -> {}",
                placement.source.display(),
                destination.display()
            ));
        }

        Ok(Outcome::Moved(Operation {
            original_path: placement.source.clone(),
            new_path: destination,
            category: placement.category.dir_name().to_string(),
        }))
    }

    /// Copies the placement's source file into its destination directory.
    ///
    /// An existing destination file is overwritten without confirmation;
    /// copy never prompts. The source is left untouched.
    pub fn copy_file(&self, placement: &Placement) -> OrganizeResult<Outcome> {
        let destination = placement.destination_file();

        if self.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Simulated copy: {} -> {}",
                placement.source.display(),
                placement.destination_dir.display()
            ));
            return Ok(Outcome::Simulated);
        }

        self.ensure_directory(&placement.destination_dir)?;

        fs::copy(&placement.source, &destination).map_err(|e| OrganizeError::FileCopyFailure {
            source: placement.source.clone(),
            destination: destination.clone(),
            source_error: e,
        })?;

        if self.verbose {
            OutputFormatter::success(&format!(
                "Copied: {} -> {}",
                placement.source.display(),
                destination.display()
            ));
        }

        Ok(Outcome::Copied)
    }
}

/// Renames `source` to `destination`, falling back to copy-then-delete when
/// the rename crosses a filesystem boundary.
fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}
