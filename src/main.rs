use clap::Parser;
use retrosort::cli::{Action, RunConfig, run_cli, undo_last_run};
use retrosort::output::OutputFormatter;
use std::path::PathBuf;
use std::process;

/// Organize Commodore disk, tape and cartridge images into directories by
/// image type and first character of the filename.
#[derive(Parser, Debug)]
#[command(name = "retrosort", version, about, long_about = None)]
struct Args {
    /// Source directory containing the files to organize
    source: PathBuf,

    /// Destination base directory
    destination: PathBuf,

    /// Action to perform on matched files
    #[arg(short, long, value_enum, default_value_t = Action::Move)]
    action: Action,

    /// Recursively search for files in the source directory
    #[arg(short, long)]
    recursive: bool,

    /// Show each operation as it happens
    #[arg(short, long)]
    verbose: bool,

    /// Simulate the run without making any changes
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Revert the previous move run recorded in the destination
    #[arg(long, conflicts_with_all = ["action", "recursive", "dry_run"])]
    undo: bool,
}

fn main() {
    let args = Args::parse();

    let result = if args.undo {
        undo_last_run(&args.destination)
    } else {
        let config = RunConfig::new(
            args.source,
            args.destination,
            args.action,
            args.recursive,
            args.verbose,
            args.dry_run,
        );
        run_cli(&config).map(|_| ())
    };

    if let Err(e) = result {
        OutputFormatter::error(&e);
        process::exit(1);
    }
}
