//! retrosort - a Commodore image collection organizer
//!
//! This library organizes disk, tape and cartridge images into a destination
//! tree bucketed by image type (D64, PRG, TAP, ...) and by the first letter
//! of the filename, with move/copy actions, dry-run simulation, verbose
//! reporting and undo of previous move runs.

pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod placement;
pub mod scanner;
pub mod undo;

pub use file_category::{Category, CategoryMatcher, bucket_for};
pub use file_organizer::{Confirmer, FileOrganizer, TerminalConfirmer};
pub use placement::Placement;
pub use undo::{UndoManager, UndoReport};

pub use cli::{Action, RunConfig, RunSummary, run_cli, run_with_confirmer};
