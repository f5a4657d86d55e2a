//! Cleaning and feature-engineering stages.
//!
//! - `date`, `time`, `duration`, `stops`, `prune`: one stage each, `Table` in, `Table` out
//! - `stages`: the [`Stage`] plan naming every step
//! - `encoder`: one-hot block computed from a cleaned table
//! - `pipeline`: load → clean → encode orchestration

pub mod date;
pub mod duration;
pub mod encoder;
pub mod pipeline;
pub mod prune;
pub mod stages;
pub mod stops;
pub mod time;

pub use date::decompose_journey_date;
pub use duration::normalize_duration;
pub use encoder::{one_hot_encode, EncodedFeature, OneHotEncoding};
pub use pipeline::*;
pub use prune::prune_columns;
pub use stages::{describe_stages, Stage};
pub use stops::map_total_stops;
pub use time::{decompose_arrival_time, decompose_departure_time};

use crate::error::{StageError, StageResult};
use crate::table::{cell_text, Table};

/// Parse every cell of `column`, failing on the first null or malformed value
/// with a `Format` error carrying the 1-based row number.
pub(crate) fn parse_column<T, E>(
    table: &Table,
    stage: &str,
    column: &str,
    expected: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> StageResult<Vec<T>> {
    table
        .column_values(stage, column)?
        .enumerate()
        .map(|(idx, value)| {
            let text = cell_text(value);
            text.as_deref()
                .and_then(|raw| parse(raw).ok())
                .ok_or_else(|| StageError::Format {
                    stage: stage.to_string(),
                    column: column.to_string(),
                    row: idx + 1,
                    value: text.unwrap_or_else(|| "null".to_string()),
                    expected: expected.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_table(columns: &[&str], rows: &[&[serde_json::Value]]) -> Table {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let records = rows
        .iter()
        .map(|cells| columns.iter().cloned().zip(cells.iter().cloned()).collect())
        .collect();
    Table::from_records(columns, records)
}
