//! CLI argument parsing for gh-diff-anchor.
//!
//! This module defines the command structure; the implementations live in
//! the `commands` module. Every file argument accepts `-` for stdin.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gh_diff_anchor_config::OutputFormat;
use std::path::PathBuf;

/// Anchor pull request review comments to lines of a locally edited file.
#[derive(Parser, Debug)]
#[command(name = "gh-diff-anchor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured one).
    #[arg(long, value_enum, global = true)]
    pub format: Option<Format>,

    /// Config file to use instead of `.gh-diff-anchor.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the hunks and lines of a single-file patch with their positions.
    Hunks(PatchArgs),

    /// List the files of a multi-file `git diff`.
    Files(FilesArgs),

    /// Map a line number from the old side of a patch to the new side.
    Map(MapArgs),

    /// Show the line ranges that may receive new review comments.
    Ranges(RangesArgs),

    /// Find the patch position for a new comment on a live buffer line.
    Position(PositionArgs),

    /// Place existing review comments on the live buffer.
    ///
    /// The PR diff may be a single-file patch or a multi-file `git diff`;
    /// comments are matched to files by path.
    Reconcile(ReconcileArgs),

    /// Rebuild the head content of a file from its base content and a patch.
    Apply(ApplyArgs),
}

#[derive(Parser, Debug)]
pub struct PatchArgs {
    /// Patch file (`-` for stdin).
    pub patch: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FilesArgs {
    /// Output of `git diff` (`-` for stdin).
    pub diff: PathBuf,
}

#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Patch file (`-` for stdin).
    pub patch: PathBuf,

    /// 1-based line number to map.
    pub line: u32,

    /// Map from the new side to the old side instead.
    #[arg(long)]
    pub reverse: bool,
}

#[derive(Parser, Debug)]
pub struct RangesArgs {
    /// Patch file (`-` for stdin).
    pub patch: PathBuf,

    /// Ranges of the base side instead of the configured default.
    #[arg(long)]
    pub base: bool,
}

#[derive(Parser, Debug)]
pub struct PositionArgs {
    /// PR patch of the file (`-` for stdin).
    pub patch: PathBuf,

    /// 1-based line in the live buffer.
    pub live_line: u32,

    /// Diff from the PR head to the live buffer.
    #[arg(long)]
    pub local_diff: Option<PathBuf>,

    /// Match base line numbers instead of the configured default side.
    #[arg(long)]
    pub base: bool,
}

#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// PR diff (`-` for stdin).
    pub patch: PathBuf,

    /// JSON array of review comments as returned by the hosting API.
    #[arg(long)]
    pub comments: PathBuf,

    /// Diff from the PR head to the live buffer.
    #[arg(long)]
    pub local_diff: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Base content of the file (`-` for stdin).
    pub base: PathBuf,

    /// Patch to apply (`-` for stdin).
    pub patch: PathBuf,
}
