//! Line-oriented driver: one JSON batch per input line, one JSON result per output line.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::engine::TaxEngine;
use crate::error::AppError;

/// Run batches from `reader` until a blank line or EOF.
///
/// Each result line is flushed before the next batch is read. Returns the
/// number of batches written.
///
/// # Errors
/// Stops at the first unreadable, malformed or rejected line.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    engine: &TaxEngine,
) -> Result<usize, AppError> {
    let mut processed = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        let batch: Value = serde_json::from_str(trimmed).map_err(|source| AppError::Json {
            line: line_no,
            source,
        })?;

        let taxes = engine
            .process_json(&batch)
            .map_err(|source| AppError::Tax {
                line: line_no,
                source,
            })?;
        tracing::debug!(line = line_no, operations = taxes.len(), "Processed batch");

        let encoded = serde_json::to_string(&taxes).map_err(|source| AppError::Json {
            line: line_no,
            source,
        })?;
        writeln!(writer, "{}", encoded)?;
        writer.flush()?;
        processed += 1;
    }

    Ok(processed)
}
