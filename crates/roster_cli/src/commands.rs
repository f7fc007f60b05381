//! Subcommand handlers: the UI event boundary of the roster.
//!
//! Handlers write to an injected writer so they can be exercised without a
//! terminal.

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use roster_core::{
    compute_view, export_rows, write_csv_file, AnnotationStore, Clock, Creator, KvRepository,
    Status, ViewQuery,
};
use std::io::{BufRead, Write};
use std::path::Path;

const RESET_PROMPT: &str = "Clear all local notes and statuses? [y/N] ";

/// Recompute-view intent.
pub fn list<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    roster: &[Creator],
    store: &AnnotationStore<R, C>,
    query: &ViewQuery,
) -> Result<()> {
    let view = compute_view(roster, store, query);
    let counts = view.counts;

    writeln!(
        out,
        "Total {} | {} {} | {} {} | {} {} | {} {}",
        counts.total,
        Status::Uncontacted.label(),
        counts.uncontacted,
        Status::Contacted.label(),
        counts.contacted,
        Status::Joined.label(),
        counts.joined,
        Status::NotFit.label(),
        counts.not_fit
    )?;
    for creator in &view.visible {
        let annotation = store.get(&creator.handle);
        writeln!(
            out,
            "@{}  [{}]  Last updated: {}  {}",
            creator.handle,
            annotation.status.label(),
            display_time(annotation.updated_at),
            creator.profile_url
        )?;
        if !annotation.note.is_empty() {
            for line in annotation.note.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }
    writeln!(out, "{} creators", view.visible_count())?;
    Ok(())
}

/// Prints one handle's annotation. Works for handles outside the roster.
pub fn show<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    store: &AnnotationStore<R, C>,
    handle: &str,
) -> Result<()> {
    let handle = normalize_handle(handle);
    let annotation = store.get(handle);
    writeln!(out, "@{handle}")?;
    writeln!(out, "profile: {}", roster_core::profile_url(handle))?;
    writeln!(out, "status: {}", annotation.status.label())?;
    writeln!(out, "last updated: {}", display_time(annotation.updated_at))?;
    writeln!(out, "note: {}", annotation.note)?;
    Ok(())
}

/// Set-status intent.
pub fn set_status<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    roster: &[Creator],
    store: &mut AnnotationStore<R, C>,
    handle: &str,
    status: &str,
) -> Result<()> {
    let Some(status) = Status::parse(status.trim()) else {
        bail!(
            "unknown status `{status}`; expected one of {}",
            status_names()
        );
    };
    let creator = find_creator(roster, handle)?;
    store
        .set_status(&creator.handle, status)
        .with_context(|| format!("failed to update @{}", creator.handle))?;
    writeln!(out, "@{} -> {}", creator.handle, status.label())?;
    Ok(())
}

/// Set-note intent.
pub fn set_note<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    roster: &[Creator],
    store: &mut AnnotationStore<R, C>,
    handle: &str,
    text: &str,
) -> Result<()> {
    let creator = find_creator(roster, handle)?;
    store
        .set_note(&creator.handle, text)
        .with_context(|| format!("failed to update @{}", creator.handle))?;
    writeln!(out, "@{} note saved", creator.handle)?;
    Ok(())
}

/// Writes the CSV export of the full roster to `path`.
pub fn export<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    roster: &[Creator],
    store: &AnnotationStore<R, C>,
    path: &Path,
) -> Result<()> {
    let rows = export_rows(roster, store);
    write_csv_file(path, &rows)
        .with_context(|| format!("failed to write export `{}`", path.display()))?;
    writeln!(out, "exported {} creators to {}", rows.len(), path.display())?;
    Ok(())
}

/// Reset-all intent, gated by confirmation unless `assume_yes`.
pub fn reset<R: KvRepository, C: Clock>(
    out: &mut impl Write,
    input: &mut impl BufRead,
    store: &mut AnnotationStore<R, C>,
    assume_yes: bool,
) -> Result<()> {
    if !assume_yes && !confirm(out, input)? {
        writeln!(out, "reset cancelled")?;
        return Ok(());
    }
    store.reset().context("failed to reset roster state")?;
    writeln!(out, "all notes and statuses cleared")?;
    Ok(())
}

fn confirm(out: &mut impl Write, input: &mut impl BufRead) -> Result<bool> {
    write!(out, "{RESET_PROMPT}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn find_creator<'a>(roster: &'a [Creator], handle: &str) -> Result<&'a Creator> {
    let handle = normalize_handle(handle);
    match roster.iter().find(|creator| creator.handle == handle) {
        Some(creator) => Ok(creator),
        None => bail!("unknown handle `@{handle}`; it is not in the loaded roster"),
    }
}

/// Accepts `@name` as well as `name`.
fn normalize_handle(handle: &str) -> &str {
    let handle = handle.trim();
    handle.strip_prefix('@').unwrap_or(handle)
}

fn status_names() -> String {
    Status::ALL
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

fn display_time(epoch_ms: i64) -> String {
    if epoch_ms == 0 {
        return "Never updated".to_string();
    }
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Never updated".to_string())
}
