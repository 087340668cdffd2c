//! Check command: verify that inferred events re-expand to the input.

use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

use anyhow::{Context, Result, bail};

use recur_core::{Event, InferenceConfig, Occurrence, infer};

/// The first difference between the input and the re-expanded events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// An input occurrence that no event reproduces.
    Missing(Occurrence),
    /// An expanded occurrence that is not in the input, or that more than one event produces.
    Unexpected(Occurrence),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, occurrence) = match self {
            Self::Missing(o) => ("missing", o),
            Self::Unexpected(o) => ("unexpected", o),
        };
        write!(
            f,
            "{kind} occurrence {:?} from {} to {}",
            occurrence.title(),
            occurrence.start(),
            occurrence.end()
        )
    }
}

/// Runs inference and checks round-trip completeness.
///
/// Fails with the first mismatch if the events do not reproduce every
/// distinct input occurrence exactly once.
pub fn run<W: Write>(writer: &mut W, occurrences: &[Occurrence], config: &InferenceConfig) -> Result<()> {
    let events = infer(occurrences, config).context("inference failed")?;

    let mut expected = occurrences.to_vec();
    expected.sort();
    expected.dedup();

    if let Some(mismatch) = first_mismatch(&expected, &events) {
        bail!("round trip failed: {mismatch}");
    }

    writeln!(
        writer,
        "OK: {} events reproduce {} distinct occurrences",
        events.len(),
        expected.len()
    )?;
    Ok(())
}

/// Compares sorted, distinct `expected` occurrences against the expansion of `events`.
pub fn first_mismatch(expected: &[Occurrence], events: &[Event]) -> Option<Mismatch> {
    let mut expanded: Vec<Occurrence> = events.iter().flat_map(Event::occurrences).collect();
    expanded.sort();

    let mut want = expected.iter().peekable();
    let mut got = expanded.into_iter().peekable();
    loop {
        let ordering = match (want.peek(), got.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(w), Some(g)) => (*w).cmp(g),
        };
        match ordering {
            Ordering::Less => return want.next().cloned().map(Mismatch::Missing),
            Ordering::Greater => return got.next().map(Mismatch::Unexpected),
            Ordering::Equal => {
                want.next();
                got.next();
            }
        }
    }
}
