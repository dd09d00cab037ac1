//! Run orchestration for retrosort.
//!
//! This module owns the run configuration and drives a complete run:
//! - Outer loop over the category table, in table order
//! - Inner traversal of the source tree, once per category
//! - Classification, placement and execution per candidate file
//! - Summary reporting and history recording
//!
//! The per-category re-traversal is deliberate: it mirrors the behavior
//! where a filename matching several categories' patterns would be handled
//! once per matching category.

use crate::file_category::{Category, CategoryMatcher};
use crate::file_organizer::{
    Confirmer, FileOrganizer, OperationLog, Outcome, TerminalConfirmer,
};
use crate::output::OutputFormatter;
use crate::placement::Placement;
use crate::scanner::scan_category;
use crate::undo::UndoManager;
use clap::ValueEnum;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The terminal operation applied to each matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Relocate the file; the source is removed on success.
    Move,
    /// Duplicate the file; the source is left untouched.
    Copy,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move => write!(f, "move"),
            Action::Copy => write!(f, "copy"),
        }
    }
}

/// Immutable configuration for one run.
///
/// `verbose` is forced true when `dry_run` is set, so a simulation always
/// shows what it would have done.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source directory containing the files to organize.
    pub source: PathBuf,
    /// Destination base directory.
    pub destination: PathBuf,
    /// Whether matched files are moved or copied.
    pub action: Action,
    /// Whether to descend into subdirectories of the source.
    pub recursive: bool,
    /// Whether to report each operation.
    pub verbose: bool,
    /// Whether to simulate without touching the filesystem.
    pub dry_run: bool,
}

impl RunConfig {
    /// Builds a run configuration, applying the dry-run/verbose coupling.
    pub fn new(
        source: PathBuf,
        destination: PathBuf,
        action: Action,
        recursive: bool,
        verbose: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            source,
            destination,
            action,
            recursive,
            verbose: verbose || dry_run,
            dry_run,
        }
    }
}

/// Tally of what a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files actually moved or copied.
    pub processed: usize,
    /// Operations reported under dry-run.
    pub simulated: usize,
    /// Files skipped after a declined overwrite.
    pub skipped: usize,
    /// Files whose operation failed.
    pub failed: usize,
    /// Processed/simulated files per category directory name.
    pub per_category: HashMap<String, usize>,
}

impl RunSummary {
    fn total(&self) -> usize {
        self.processed + self.simulated + self.skipped + self.failed
    }
}

/// Runs a full organization pass with the interactive terminal confirmer.
///
/// # Examples
///
/// ```no_run
/// use retrosort::cli::{Action, RunConfig, run_cli};
/// use std::path::PathBuf;
///
/// let config = RunConfig::new(
///     PathBuf::from("/incoming"),
///     PathBuf::from("/sorted"),
///     Action::Move,
///     false,
///     true,
///     false,
/// );
/// match run_cli(&config) {
///     Ok(summary) => println!("Processed {} files", summary.processed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(config: &RunConfig) -> Result<RunSummary, String> {
    let mut confirmer = TerminalConfirmer;
    run_with_confirmer(config, &mut confirmer)
}

/// Runs a full organization pass with a caller-supplied confirmer.
///
/// Tests pass a closure here to answer overwrite prompts deterministically.
pub fn run_with_confirmer(
    config: &RunConfig,
    confirmer: &mut dyn Confirmer,
) -> Result<RunSummary, String> {
    if !config.source.is_dir() {
        return Err(format!(
            "Source directory does not exist: {}",
            config.source.display()
        ));
    }

    if config.dry_run {
        OutputFormatter::info(&format!(
            "DRY RUN: analyzing contents of: {}",
            config.source.display()
        ));
    } else {
        OutputFormatter::info(&format!(
            "Organizing {} into {}",
            config.source.display(),
            config.destination.display()
        ));
    }

    let matcher = CategoryMatcher::new();
    let organizer = FileOrganizer::new(config.dry_run, config.verbose);
    let mut log = OperationLog::new(config.source.clone(), config.destination.clone());
    let mut summary = RunSummary::default();

    // The source tree is walked once per category; table order decides which
    // files are handled first.
    for category in Category::ALL {
        let candidates =
            match scan_category(&config.source, category, &matcher, config.recursive) {
                Ok(candidates) => candidates,
                Err(e) => {
                    OutputFormatter::error(&format!(
                        "Error scanning for {}: {}",
                        category.dir_name(),
                        e
                    ));
                    summary.failed += 1;
                    continue;
                }
            };
        if candidates.is_empty() {
            continue;
        }

        let bar = (!config.verbose)
            .then(|| OutputFormatter::create_progress_bar(candidates.len() as u64));

        for candidate in candidates {
            let placement = Placement::plan(&config.destination, category, candidate);
            let outcome = match config.action {
                Action::Move => organizer.move_file(&placement, confirmer),
                Action::Copy => organizer.copy_file(&placement),
            };

            match outcome {
                Ok(Outcome::Moved(operation)) => {
                    summary.processed += 1;
                    *summary
                        .per_category
                        .entry(category.dir_name().to_string())
                        .or_insert(0) += 1;
                    log.add_operation(operation);
                }
                Ok(Outcome::Copied) => {
                    summary.processed += 1;
                    *summary
                        .per_category
                        .entry(category.dir_name().to_string())
                        .or_insert(0) += 1;
                }
                Ok(Outcome::Simulated) => {
                    summary.simulated += 1;
                    *summary
                        .per_category
                        .entry(category.dir_name().to_string())
                        .or_insert(0) += 1;
                }
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    OutputFormatter::error(&e.to_string());
                    summary.failed += 1;
                }
            }

            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
    }

    if summary.total() == 0 {
        OutputFormatter::plain("No files found to organize.");
        return Ok(summary);
    }

    if config.action == Action::Move && !config.dry_run && !log.is_empty() {
        match log.save(&config.destination) {
            Ok(()) => OutputFormatter::plain(&format!(
                "History saved. Use 'retrosort {} {} --undo' to revert changes.",
                config.source.display(),
                config.destination.display()
            )),
            Err(e) => OutputFormatter::warning(&format!("Could not save history: {}", e)),
        }
    }

    OutputFormatter::summary_table(&summary.per_category, summary.processed + summary.simulated);

    if config.dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    }
    if summary.skipped > 0 {
        OutputFormatter::plain(&format!(
            "{} {} skipped after declined overwrite.",
            summary.skipped,
            if summary.skipped == 1 { "file" } else { "files" }
        ));
    }
    if summary.failed > 0 {
        OutputFormatter::warning(&format!(
            "{} {} could not be organized. Please review errors above.",
            summary.failed,
            if summary.failed == 1 { "file" } else { "files" }
        ));
    }

    Ok(summary)
}

/// Undoes the previous organization run recorded in `destination`.
pub fn undo_last_run(destination: &Path) -> Result<(), String> {
    OutputFormatter::info("Undoing previous organization...");

    match UndoManager::undo(destination) {
        Ok(report) => {
            OutputFormatter::success("Undo complete!");
            OutputFormatter::plain(&format!("  Restored: {}", report.restored_files));

            if !report.skipped_files.is_empty() {
                OutputFormatter::plain(&format!("  Skipped: {}", report.skipped_files.len()));
                for (path, reason) in &report.skipped_files {
                    OutputFormatter::plain(&format!("    - {}: {}", path.display(), reason));
                }
            }

            if !report.failed_restores.is_empty() {
                OutputFormatter::plain(&format!("  Failed: {}", report.failed_restores.len()));
                for (path, reason) in &report.failed_restores {
                    OutputFormatter::error(&format!("    - {}: {}", path.display(), reason));
                }
                OutputFormatter::warning("History file was NOT deleted due to failures.");
            }

            Ok(())
        }
        Err(e) => Err(format!("Error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_forces_verbose() {
        let config = RunConfig::new(
            PathBuf::from("/src"),
            PathBuf::from("/dest"),
            Action::Move,
            false,
            false,
            true,
        );
        assert!(config.verbose);
        assert!(config.dry_run);
    }

    #[test]
    fn test_verbose_untouched_without_dry_run() {
        let config = RunConfig::new(
            PathBuf::from("/src"),
            PathBuf::from("/dest"),
            Action::Copy,
            true,
            false,
            false,
        );
        assert!(!config.verbose);
        assert!(config.recursive);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Move.to_string(), "move");
        assert_eq!(Action::Copy.to_string(), "copy");
    }

    #[test]
    fn test_run_missing_source_is_fatal() {
        let config = RunConfig::new(
            PathBuf::from("/non/existent/path"),
            PathBuf::from("/dest"),
            Action::Move,
            false,
            false,
            false,
        );
        let result = run_with_confirmer(&config, &mut |_: &std::path::Path| true);
        assert!(result.is_err());
    }
}
