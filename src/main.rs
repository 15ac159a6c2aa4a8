use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use diffkit::diff::{UnifiedDiff, UnifiedDiffOptions, format};
use diffkit::{CharacterDiff, DiffOp, ParseError, PatchError, WordDiff, patch, side_by_side};
use error_set::error_set;

error_set! {
    /// Errors from the command line front end
    CliError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("Failed to write output: {message}")]
        WriteFailed { message: String },
        ParseError(ParseError),
        PatchError(PatchError),
    }
}

#[derive(Parser)]
#[command(name = "diffkit")]
#[command(about = "Line, word and character diffs with unified and side-by-side output")]
struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a unified diff of two files
    Unified {
        old: PathBuf,
        new: PathBuf,
        /// Unchanged lines shown around each change
        #[arg(short = 'U', long = "unified", default_value_t = 3)]
        context: usize,
        /// Name for the old file in the `---` header (defaults to its path)
        #[arg(long)]
        old_label: Option<String>,
        /// Name for the new file in the `+++` header (defaults to its path)
        #[arg(long)]
        new_label: Option<String>,
    },
    /// Print two files in aligned columns
    SideBySide {
        old: PathBuf,
        new: PathBuf,
        /// Characters of content per column
        #[arg(short, long, default_value_t = 40)]
        width: usize,
    },
    /// Print a word diff with [-removed-] and {+added+} markers
    Words { old: PathBuf, new: PathBuf },
    /// Print the similarity of two strings, from 0 to 1
    Similarity { a: String, b: String },
    /// Validate a unified diff and summarize its hunks
    Check { patch: PathBuf },
    /// Apply a unified diff to a file and print the result
    Apply { old: PathBuf, patch: PathBuf },
    /// Generate shell completions
    Completions { shell: Shell },
    /// Generate a man page
    Man,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Unified {
            old,
            new,
            context,
            old_label,
            new_label,
        } => {
            let options = UnifiedDiffOptions::new(
                old_label.unwrap_or_else(|| old.display().to_string()),
                new_label.unwrap_or_else(|| new.display().to_string()),
            )
            .context_lines(context);
            emit(&format(&read(&old)?, &read(&new)?, &options))
        }
        Commands::SideBySide { old, new, width } => emit(&side_by_side::format_as_table(
            &read(&old)?,
            &read(&new)?,
            width,
        )),
        Commands::Words { old, new } => emit(&word_markup(&read(&old)?, &read(&new)?)),
        Commands::Similarity { a, b } => {
            emit(&format!("{:.4}\n", CharacterDiff::similarity(&a, &b)))
        }
        Commands::Check { patch: patch_path } => {
            let diff = UnifiedDiff::parse_strict(&read(&patch_path)?)?;
            emit(&summary(&diff))
        }
        Commands::Apply {
            old,
            patch: patch_path,
        } => {
            let diff = UnifiedDiff::parse_strict(&read(&patch_path)?)?;
            emit(&patch::apply(&read(&old)?, &diff)?)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "diffkit", &mut io::stdout());
            Ok(())
        }
        Commands::Man => clap_mangen::Man::new(Cli::command())
            .render(&mut io::stdout())
            .map_err(|e| CliError::WriteFailed {
                message: e.to_string(),
            }),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn emit(text: &str) -> Result<(), CliError> {
    io::stdout()
        .lock()
        .write_all(text.as_bytes())
        .map_err(|e| CliError::WriteFailed {
            message: e.to_string(),
        })
}

/// Render a word diff inline, joining consecutive tokens of the same kind
/// under one marker.
fn word_markup(old: &str, new: &str) -> String {
    let mut out = String::new();
    let mut open: Option<DiffOp> = None;

    for token in WordDiff::diff(old, new) {
        if open != Some(token.op) {
            close_marker(&mut out, open);
            match token.op {
                DiffOp::Delete => out.push_str("[-"),
                DiffOp::Insert => out.push_str("{+"),
                DiffOp::Equal => {}
            }
            open = Some(token.op);
        }
        out.push_str(token.value);
    }
    close_marker(&mut out, open);

    out
}

fn close_marker(out: &mut String, op: Option<DiffOp>) {
    match op {
        Some(DiffOp::Delete) => out.push_str("-]"),
        Some(DiffOp::Insert) => out.push_str("+}"),
        _ => {}
    }
}

fn summary(diff: &UnifiedDiff) -> String {
    let mut out = format!(
        "{} -> {}: {} hunk(s)\n",
        diff.old_file,
        diff.new_file,
        diff.hunks.len()
    );
    for hunk in &diff.hunks {
        let added = hunk.lines.iter().filter(|l| l.op == DiffOp::Insert).count();
        let removed = hunk.lines.iter().filter(|l| l.op == DiffOp::Delete).count();
        out.push_str(&format!("{} +{} -{}\n", hunk.header(), added, removed));
    }
    out
}

#[cfg(feature = "tracing")]
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing(_verbose: u8) {}
