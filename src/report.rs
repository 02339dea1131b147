// src/report.rs
// =============================================================================
// Turning a FinalState into something a human (or a script) can read.
//
// Outputs:
// - results file:  every fetch result grouped by depth, with a per-depth
//                  summary (default: results.txt)
// - visited file:  every claimed URL, marked [Processed], [Unprocessed]
//                  (beyond max depth) or [Abandoned] (claimed, then dropped
//                  by cancellation or a panic) (default: all_visited.txt)
// - console table: per-depth success/failure counts
// - JSON:          the whole FinalState, for --json
//
// The file writers take any io::Write, so tests can render into a Vec<u8>.
// Writing a report never touches the crawl state; it has already finished.
// =============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::crawl::FinalState;
use crate::error::Result;

pub fn write_results<W: Write>(state: &FinalState, out: &mut W) -> io::Result<()> {
    writeln!(out, "Total visited URLs: {}", state.visited.len())?;
    writeln!(out)?;

    for (depth, records) in &state.results_by_depth {
        writeln!(out, "--- Depth {} ---", depth)?;

        for record in records {
            let label = if record.success { "[Success] " } else { "[Failed]  " };
            writeln!(out, "{}{}", label, record.url)?;
        }

        let summary = state.summary(*depth);
        writeln!(out)?;
        writeln!(out, "Depth {} Summary:", depth)?;
        writeln!(out, "Successful: {}", summary.successful)?;
        writeln!(out, "Failed: {}", summary.failed)?;
        writeln!(out, "Total: {}", summary.total())?;
        writeln!(out)?;
    }

    Ok(())
}

pub fn write_visited<W: Write>(state: &FinalState, out: &mut W) -> io::Result<()> {
    writeln!(out, "Total visited URLs: {}", state.visited.len())?;
    writeln!(out)?;

    let processed = state.processed_urls();
    for url in &state.visited {
        let label = if processed.contains(url.as_str()) {
            "[Processed] "
        } else if state.abandoned.contains(url) {
            "[Abandoned] "
        } else {
            "[Unprocessed] "
        };
        writeln!(out, "{}{}", label, url)?;
    }

    if state.cancelled {
        writeln!(out)?;
        writeln!(
            out,
            "Note: crawl was cancelled; [Abandoned] URLs were claimed but never fetched"
        )?;
    }

    Ok(())
}

pub fn save_results(state: &FinalState, path: &Path) -> Result<()> {
    save_with(path, |out| write_results(state, out))
}

pub fn save_visited(state: &FinalState, path: &Path) -> Result<()> {
    save_with(path, |out| write_visited(state, out))
}

fn save_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

pub fn to_json(state: &FinalState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Prints a per-depth breakdown table to stdout.
pub fn print_summary(state: &FinalState) {
    println!("{:<8} {:>12} {:>10} {:>10}", "DEPTH", "SUCCESSFUL", "FAILED", "TOTAL");
    println!("{}", "=".repeat(43));

    let mut successful = 0;
    let mut failed = 0;
    for (depth, summary) in state.summaries() {
        println!(
            "{:<8} {:>12} {:>10} {:>10}",
            depth,
            summary.successful,
            summary.failed,
            summary.total()
        );
        successful += summary.successful;
        failed += summary.failed;
    }

    println!();
    println!("📊 Summary:");
    println!("   🌐 Visited: {}", state.visited.len());
    println!("   ✅ Successful: {}", successful);
    println!("   ❌ Failed: {}", failed);
    println!("   ⏭️  Unprocessed: {}", state.unprocessed_urls().len());
    if !state.abandoned.is_empty() {
        println!("   🚫 Abandoned: {}", state.abandoned.len());
    }
    if state.cancelled {
        println!("   ⚠️  Crawl was cancelled before the frontier was exhausted");
    }
}
