//! tagwright CLI
//!
//! # What this program is
//! A small command line tool that loads audio files (and `.lrc` sidecars),
//! shows and edits their tags, and exports them as JSON or CSV.
//!
//! # How it is put together
//! - `main.rs` only parses arguments and prints results.
//! - Everything real lives in `tagwright::core`:
//!   - `library` finds/loads/saves files
//!   - `accessor` + `catalog` handle the standard fields (Title, Artists, Track...)
//!   - `custom` handles per-format custom entries (TXXX frames, dash-boxes, ...)
//!   - `export` builds the JSON graph; `csv` flattens it
//!
//! # What gets written to disk
//! Only ID3v2 tags. Other families can be edited in memory and exported, but a
//! save keeps the audio payload and re-renders the ID3 tag in front of it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use tagwright::core::batch::{CancelFlag, Progress};
use tagwright::core::custom::{self, Id3FrameHint};
use tagwright::core::export::{self, BinaryPolicy, ExportFormat, ExportMode, Resolver};
use tagwright::core::family::{ContainerFamily, is_auto_duplicated};
use tagwright::core::types::FileEntry;
use tagwright::core::{apply_standard_field, catalog, library, load_files, lyrics};

#[derive(Parser, Debug)]
#[command(name = "tagwright", version, about = "Inspect, edit and export media tags")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the standard field catalog.
    Fields,

    /// List custom metadata entries.
    List {
        /// Files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only this family (ID3, APPLE, XIPH, ...).
        #[arg(long, env = "TAGWRIGHT_FAMILY")]
        family: Option<ContainerFamily>,

        /// Include binary payloads (shown as a placeholder).
        #[arg(long)]
        include_binary: bool,

        /// Also show keys the standard fields already cover.
        #[arg(long)]
        all: bool,
    },

    /// Export tags as JSON or CSV.
    Export {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(long, env = "TAGWRIGHT_FORMAT", default_value = "json")]
        format: ExportFormat,

        /// common | all-taglib | all-taglib-specific-only | all-app
        #[arg(long, env = "TAGWRIGHT_MODE", default_value = "common")]
        mode: ExportMode,

        /// omit | reference | base64
        #[arg(long, env = "TAGWRIGHT_BINARY", default_value = "omit")]
        binary: BinaryPolicy,

        /// Write here instead of stdout.
        #[arg(long, short, value_name = "FILE", env = "TAGWRIGHT_OUT")]
        out: Option<PathBuf>,
    },

    /// Set one standard field on every file and save. Omit the value to clear it.
    Set {
        /// Display or accessor name (`Track count`, `TrackCount`).
        field: String,

        #[arg(long)]
        value: Option<String>,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Add a custom entry to every file and save.
    Add {
        family: ContainerFamily,
        key: String,
        value: String,

        /// Mean-string (APPLE) or parent tag (MATROSKA).
        #[arg(long)]
        mean: Option<String>,

        /// user-text | private | comment
        #[arg(long, default_value = "user-text")]
        id3_frame: Id3FrameHint,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rename a custom entry's key in every file and save.
    Rename {
        family: ContainerFamily,
        key: String,
        new_key: String,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete a custom entry from every file and save.
    Remove {
        family: ContainerFamily,
        key: String,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Store `.lrc` sidecar text in the Lyrics field of matching audio files.
    EmbedLyrics {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::Fields => print_fields(),
        Command::List {
            paths,
            family,
            include_binary,
            all,
        } => list(&paths, family, include_binary, all),
        Command::Export {
            paths,
            format,
            mode,
            binary,
            out,
        } => export_paths(&paths, format, Resolver::new(mode, binary), out.as_deref()),
        Command::Set { field, value, paths } => set_field(&paths, &field, value.as_deref()),
        Command::Add {
            family,
            key,
            value,
            mean,
            id3_frame,
            paths,
        } => add_entry(&paths, family, &key, &value, mean.as_deref(), id3_frame),
        Command::Rename {
            family,
            key,
            new_key,
            paths,
        } => edit_entries(&paths, family, &key, |tag, entry| {
            custom::rename_key(tag, entry, &new_key)
        }),
        Command::Remove { family, key, paths } => {
            edit_entries(&paths, family, &key, custom::delete)
        }
        Command::EmbedLyrics { paths } => embed_lyrics(&paths),
    }
}

/// Paths -> loaded entries, paired by index with where they came from.
fn load(paths: &[PathBuf]) -> Result<(Vec<PathBuf>, Vec<FileEntry>)> {
    let (paths, entries, failures) = load_files(library::collect_paths(paths)?);
    if failures > 0 {
        warn!(failures, "some files could not be loaded");
    }
    if entries.is_empty() {
        bail!("no loadable files");
    }
    Ok((paths, entries))
}

fn log_progress(p: &Progress) {
    debug!(title = %p.title, current = p.current, max = p.max, "progress");
}

fn save_all<'a>(
    pairs: impl IntoIterator<Item = (&'a PathBuf, &'a mut FileEntry)>,
) -> Result<usize> {
    let mut saved = 0;
    for (path, entry) in pairs {
        library::save_file(path, entry)?;
        saved += 1;
    }
    Ok(saved)
}

fn print_fields() -> Result<()> {
    let mut out = std::io::stdout().lock();
    for field in catalog::STANDARD_FIELDS {
        writeln!(out, "{:<24} {:<18} {:?}", field.display_name, field.accessor, field.kind)?;
    }
    Ok(())
}

fn list(
    paths: &[PathBuf],
    family: Option<ContainerFamily>,
    include_binary: bool,
    all: bool,
) -> Result<()> {
    let (_, entries) = load(paths)?;
    let mut out = std::io::stdout().lock();

    for file in &entries {
        let families = match family {
            Some(f) => vec![f],
            None => file.tag.families(),
        };
        writeln!(out, "{}", file.name)?;
        for family in families {
            let items = match custom::enumerate(family, &file.tag, include_binary) {
                Ok(items) => items,
                Err(e) => {
                    writeln!(out, "  {family}: {e}")?;
                    continue;
                }
            };
            for item in items.iter().filter(|i| all || !is_auto_duplicated(family, &i.key)) {
                let key = match item.mean_key.as_deref() {
                    Some(mean) if !mean.is_empty() => format!("{mean}:{}", item.key),
                    _ => item.key.clone(),
                };
                writeln!(out, "  {family}\t{key}\t{}", item.display_value())?;
            }
        }
    }
    Ok(())
}

fn export_paths(
    paths: &[PathBuf],
    format: ExportFormat,
    resolver: Resolver,
    out: Option<&Path>,
) -> Result<()> {
    let (_, entries) = load(paths)?;
    let (text, report) =
        export::export_files(&entries, format, &resolver, &CancelFlag::new(), log_progress)?;

    match out {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            info!(file = %path.display(), files = report.processed, "export written");
        }
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn set_field(paths: &[PathBuf], field: &str, value: Option<&str>) -> Result<()> {
    let field = catalog::find(field).with_context(|| format!("unknown field `{field}`"))?;
    let (paths, mut entries) = load(paths)?;

    let report = apply_standard_field(&mut entries, field, value, &CancelFlag::new(), log_progress);
    let saved = save_all(paths.iter().zip(entries.iter_mut()))?;
    info!(field = field.accessor, ?report, saved, "field applied");
    Ok(())
}

fn warn_unsaved(family: ContainerFamily) {
    if family != ContainerFamily::Id3 {
        warn!(%family, "only ID3 tags are written to disk; change kept in memory only");
    }
}

fn add_entry(
    paths: &[PathBuf],
    family: ContainerFamily,
    key: &str,
    value: &str,
    mean: Option<&str>,
    hint: Id3FrameHint,
) -> Result<()> {
    warn_unsaved(family);
    let (paths, mut entries) = load(paths)?;
    let mut changed = Vec::new();

    for (path, entry) in paths.iter().zip(entries.iter_mut()) {
        match custom::apply_new_entry(family, &mut entry.tag, key, value, mean, hint) {
            Ok(()) => changed.push((path, entry)),
            Err(e) => warn!(file = %entry.name, error = %e, "entry not added"),
        }
    }

    let saved = save_all(changed)?;
    info!(%family, key, saved, "entry added");
    Ok(())
}

/// Apply `op` to the first entry of `family` named `key` in every file.
fn edit_entries(
    paths: &[PathBuf],
    family: ContainerFamily,
    key: &str,
    mut op: impl FnMut(
        &mut tagwright::core::tags::TagFile,
        &mut custom::MetadataEntry,
    ) -> Result<custom::Change, tagwright::core::error::AdapterError>,
) -> Result<()> {
    warn_unsaved(family);
    let (paths, mut entries) = load(paths)?;
    let mut changed = Vec::new();

    for (path, entry) in paths.iter().zip(entries.iter_mut()) {
        let found = custom::enumerate(family, &entry.tag, true)
            .ok()
            .and_then(|items| items.into_iter().find(|i| i.key == key));
        let Some(mut item) = found else {
            debug!(file = %entry.name, key, "no such entry");
            continue;
        };
        match op(&mut entry.tag, &mut item) {
            Ok(change) => {
                debug!(file = %entry.name, ?change, "entry changed");
                changed.push((path, entry));
            }
            Err(e) => warn!(file = %entry.name, error = %e, "entry unchanged"),
        }
    }

    let saved = save_all(changed)?;
    info!(%family, key, saved, "entries updated");
    Ok(())
}

fn embed_lyrics(paths: &[PathBuf]) -> Result<()> {
    let (paths, mut entries) = load(paths)?;
    let updated = lyrics::embed_sidecars(&mut entries);

    let dirty = paths
        .iter()
        .zip(entries.iter_mut())
        .filter(|(_, e)| e.tag.is_dirty());
    let saved = save_all(dirty)?;
    info!(updated, saved, "lyrics embedded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_options_parse() {
        let cli = Cli::try_parse_from([
            "tagwright",
            "export",
            "a.mp3",
            "--format",
            "csv",
            "--mode",
            "all-app",
            "--binary",
            "base64",
        ])
        .unwrap();
        let Command::Export {
            format, mode, binary, ..
        } = cli.command
        else {
            panic!("expected export");
        };
        assert_eq!(format, ExportFormat::Csv);
        assert_eq!(mode, ExportMode::AllApp);
        assert_eq!(binary, BinaryPolicy::Base64);
    }
}
