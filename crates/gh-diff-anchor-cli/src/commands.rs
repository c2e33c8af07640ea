//! Command implementations.
//!
//! Each command reads its inputs, runs the engine and writes one result to
//! `out`, either as text or as a JSON document.

use crate::cli::{
    ApplyArgs, Command, FilesArgs, MapArgs, PatchArgs, PositionArgs, RangesArgs, ReconcileArgs,
};
use crate::input::Inputs;
use anyhow::{Context, Result};
use gh_diff_anchor::{
    apply_patch, collect_hunks, get_commenting_ranges, group_into_threads,
    map_comments_to_head, map_head_line_to_diff_hunk_position, map_new_position_to_old,
    map_old_position_to_new, parse_unified_diff, DiffHunk, DiffSide, DiffStats, FileDiff,
    FileStatus, LineRange, LiveLine, ReviewComment,
};
use gh_diff_anchor_config::OutputFormat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Settings resolved from the command line and the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: OutputFormat,
    pub pretty_json: bool,
    pub default_side: DiffSide,
}

impl Settings {
    fn side(&self, base: bool) -> DiffSide {
        if base {
            DiffSide::Left
        } else {
            self.default_side
        }
    }

    /// Write `value` as JSON, or run `text` in text mode.
    fn emit<T, F>(&self, out: &mut dyn Write, value: &T, text: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        match self.format {
            OutputFormat::Json if self.pretty_json => {
                serde_json::to_writer_pretty(&mut *out, value)?;
                writeln!(out)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, value)?;
                writeln!(out)?;
            }
            OutputFormat::Text => text(out)?,
        }
        Ok(())
    }
}

pub fn run(command: Command, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let mut inputs = Inputs::default();
    match command {
        Command::Hunks(args) => hunks(args, settings, &mut inputs, out),
        Command::Files(args) => files(args, settings, &mut inputs, out),
        Command::Map(args) => map(args, settings, &mut inputs, out),
        Command::Ranges(args) => ranges(args, settings, &mut inputs, out),
        Command::Position(args) => position(args, settings, &mut inputs, out),
        Command::Reconcile(args) => reconcile(args, settings, &mut inputs, out),
        Command::Apply(args) => apply(args, settings, &mut inputs, out),
    }
}

#[derive(Serialize)]
struct HunksReport {
    stats: DiffStats,
    hunks: Vec<DiffHunk>,
}

fn hunks(
    args: PatchArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let hunks = collect_hunks(&inputs.read(&args.patch)?);
    let report = HunksReport {
        stats: DiffStats::from_hunks(&hunks),
        hunks,
    };

    settings.emit(out, &report, |out| {
        for line in report.hunks.iter().flat_map(|hunk| &hunk.diff_lines) {
            writeln!(
                out,
                "{:>4} {:>5} {:>5} {}",
                line.position_in_hunk,
                optional(line.old_line_number),
                optional(line.new_line_number),
                line.raw_text
            )?;
        }
        writeln!(
            out,
            "{} hunk(s), +{} -{}",
            report.stats.hunks, report.stats.additions, report.stats.deletions
        )
    })
}

#[derive(Serialize)]
struct FileSummary<'a> {
    path: &'a str,
    old_path: Option<&'a str>,
    status: FileStatus,
    is_binary: bool,
    hunks: usize,
    additions: usize,
    deletions: usize,
}

impl<'a> From<&'a FileDiff> for FileSummary<'a> {
    fn from(file: &'a FileDiff) -> Self {
        Self {
            path: &file.path,
            old_path: file.old_path.as_deref(),
            status: file.status,
            is_binary: file.is_binary,
            hunks: file.hunks.len(),
            additions: file.additions,
            deletions: file.deletions,
        }
    }
}

fn files(
    args: FilesArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let files = parse_unified_diff(&inputs.read(&args.diff)?);
    let summaries: Vec<FileSummary> = files.iter().map(FileSummary::from).collect();

    settings.emit(out, &summaries, |out| {
        for file in &files {
            if file.is_binary {
                writeln!(out, "{} {} (binary)", file.status.as_char(), file.display_name())?;
            } else {
                writeln!(
                    out,
                    "{} {} +{} -{}",
                    file.status.as_char(),
                    file.display_name(),
                    file.additions,
                    file.deletions
                )?;
            }
        }
        Ok(())
    })
}

#[derive(Serialize)]
struct MapReport {
    from: DiffSide,
    line: u32,
    mapped: u32,
}

fn map(
    args: MapArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let patch = inputs.read(&args.patch)?;
    let (from, mapped) = if args.reverse {
        (DiffSide::Right, map_new_position_to_old(&patch, args.line))
    } else {
        (DiffSide::Left, map_old_position_to_new(&patch, args.line))
    };
    log::debug!("Mapped {} line {} to {}", from.as_github_str(), args.line, mapped);

    let report = MapReport {
        from,
        line: args.line,
        mapped,
    };
    settings.emit(out, &report, |out| writeln!(out, "{}", report.mapped))
}

#[derive(Serialize)]
struct RangesReport {
    side: DiffSide,
    ranges: Vec<LineRange>,
}

fn ranges(
    args: RangesArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let hunks = collect_hunks(&inputs.read(&args.patch)?);
    let side = settings.side(args.base);
    let report = RangesReport {
        side,
        ranges: get_commenting_ranges(&hunks, side),
    };

    settings.emit(out, &report, |out| {
        for range in &report.ranges {
            writeln!(out, "{}", range)?;
        }
        Ok(())
    })
}

#[derive(Serialize)]
struct PositionReport {
    side: DiffSide,
    live_line: LiveLine,
    position: Option<u32>,
}

fn position(
    args: PositionArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let hunks = collect_hunks(&inputs.read(&args.patch)?);
    let local_diff = inputs.read_optional(args.local_diff.as_deref())?;
    let side = settings.side(args.base);
    let live_line = LiveLine::new(args.live_line);

    let report = PositionReport {
        side,
        live_line,
        position: map_head_line_to_diff_hunk_position(&hunks, &local_diff, live_line, side),
    };
    if report.position.is_none() {
        log::info!("Line {} cannot be commented on", live_line);
    }
    settings.emit(out, &report, |out| writeln!(out, "{}", optional(report.position)))
}

fn reconcile(
    args: ReconcileArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let files = parse_unified_diff(&inputs.read(&args.patch)?);
    let local_files = parse_unified_diff(&inputs.read_optional(args.local_diff.as_deref())?);
    let comments: Vec<ReviewComment> = serde_json::from_str(&inputs.read(&args.comments)?)
        .with_context(|| format!("Failed to parse comments from {}", args.comments.display()))?;
    log::info!("Reconciling {} comment(s) across {} file(s)", comments.len(), files.len());

    let placed = reconcile_comments(&files, &local_files, comments);

    settings.emit(out, &placed, |out| {
        for (key, thread) in group_into_threads(placed.iter().cloned()) {
            // The root comment decides where the thread is drawn
            let anchor = thread.first().and_then(|root| root.absolute_position);
            let location = match anchor {
                Some(line) => format!("{}:{}", key.path, line),
                None => format!("{}:outdated", key.path),
            };
            let ids: Vec<String> = thread.iter().map(|c| format!("#{}", c.id)).collect();
            writeln!(out, "{} {}", location, ids.join(" "))?;
        }
        Ok(())
    })
}

/// Reconcile comments file by file, keeping their input order.
///
/// A bare single-file patch parses with an empty path and applies to every
/// comment. Comments on files missing from the PR diff come out outdated.
fn reconcile_comments(
    files: &[FileDiff],
    local_files: &[FileDiff],
    comments: Vec<ReviewComment>,
) -> Vec<ReviewComment> {
    let mut by_path: BTreeMap<String, Vec<(usize, ReviewComment)>> = BTreeMap::new();
    for (index, comment) in comments.into_iter().enumerate() {
        by_path.entry(comment.path.clone()).or_default().push((index, comment));
    }

    let mut placed = Vec::new();
    for (path, group) in by_path {
        let hunks = find_file(files, &path).map_or(&[][..], |file| file.hunks.as_slice());
        let local_diff = find_file(local_files, &path).map_or("", |file| file.patch.as_str());
        if hunks.is_empty() {
            log::warn!("No hunks for {} in the PR diff", path);
        }

        let (indices, group): (Vec<usize>, Vec<ReviewComment>) = group.into_iter().unzip();
        placed.extend(indices.into_iter().zip(map_comments_to_head(hunks, local_diff, group)));
    }

    placed.sort_by_key(|(index, _)| *index);
    placed.into_iter().map(|(_, comment)| comment).collect()
}

fn find_file<'a>(files: &'a [FileDiff], path: &str) -> Option<&'a FileDiff> {
    files
        .iter()
        .find(|file| file.path == path)
        .or_else(|| match files {
            [single] if single.path.is_empty() => Some(single),
            _ => None,
        })
}

#[derive(Serialize)]
struct ApplyReport<'a> {
    content: &'a str,
}

fn apply(
    args: ApplyArgs,
    settings: &Settings,
    inputs: &mut Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let base = inputs.read(&args.base)?;
    let patch = inputs.read(&args.patch)?;
    let head = apply_patch(&base, &patch)
        .with_context(|| format!("Failed to apply {}", args.patch.display()))?;

    settings.emit(out, &ApplyReport { content: &head }, |out| out.write_all(head.as_bytes()))
}

fn optional(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
