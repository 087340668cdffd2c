//! Infer command: compress an occurrence pool into recurring events.

use std::io::Write;

use anyhow::{Context, Result};

use recur_core::{Event, InferenceConfig, InferenceSummary, Occurrence, Termination, infer};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Runs inference and writes either a text summary or the events as JSON.
///
/// With `until`, patterns are bounded by their last instant instead of a count.
pub fn run<W: Write>(
    writer: &mut W,
    occurrences: &[Occurrence],
    config: &InferenceConfig,
    json: bool,
    until: bool,
) -> Result<()> {
    let mut events = infer(occurrences, config).context("inference failed")?;
    if until {
        events = events.iter().map(Event::to_until).collect();
    }

    if json {
        serde_json::to_writer_pretty(&mut *writer, &events).context("failed to serialize events")?;
        writeln!(writer)?;
    } else {
        let summary = InferenceSummary::from_events(&events, occurrences.len());
        render_summary(writer, &events, &summary)?;
    }

    Ok(())
}

/// Writes the run totals followed by one line per event.
pub fn render_summary<W: Write>(
    writer: &mut W,
    events: &[Event],
    summary: &InferenceSummary,
) -> Result<()> {
    writeln!(writer, "Occurrences: {}", summary.occurrences)?;
    writeln!(
        writer,
        "Events: {} ({} recurring, {} one-off)",
        summary.events, summary.recurring, summary.one_off
    )?;
    writeln!(writer, "Exceptions: {}", summary.exceptions)?;
    writeln!(writer, "Additions: {}", summary.additions)?;
    writeln!(writer, "Compression: {:.2}x", summary.compression_ratio())?;

    if events.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    for event in events {
        writeln!(writer, "{}", describe_event(event))?;
    }

    Ok(())
}

fn describe_event(event: &Event) -> String {
    let anchor = event.anchor();
    let title = if anchor.title().is_empty() {
        "(untitled)"
    } else {
        anchor.title()
    };

    let mut parts = vec![match event.pattern() {
        Some(pattern) => {
            let every = format_interval(pattern.interval_ms());
            match pattern.termination() {
                Termination::Count(count) => format!("every {every} x{count}"),
                Termination::Until(until) => {
                    format!("every {every} until {}", until.format("%Y-%m-%d %H:%M"))
                }
            }
        }
        None => "one-off".to_string(),
    }];
    if !event.exceptions().is_empty() {
        parts.push(plural(event.exceptions().len(), "exception"));
    }
    if !event.additions().is_empty() {
        parts.push(plural(event.additions().len(), "addition"));
    }
    let last = event.last_start();
    if last != anchor.start() && event.pattern().and_then(|p| p.until()) != Some(last) {
        parts.push(format!("last {}", last.format("%Y-%m-%d %H:%M")));
    }

    format!(
        "{}  {title}  {}",
        anchor.start().format("%Y-%m-%d %H:%M"),
        parts.join(", ")
    )
}

/// Formats an interval in the largest whole unit that divides it.
fn format_interval(ms: i64) -> String {
    if ms % DAY_MS == 0 {
        format!("{}d", ms / DAY_MS)
    } else if ms % HOUR_MS == 0 {
        format!("{}h", ms / HOUR_MS)
    } else if ms % MINUTE_MS == 0 {
        format!("{}m", ms / MINUTE_MS)
    } else {
        format!("{ms}ms")
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
