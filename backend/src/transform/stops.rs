//! Stop-count mapping: `Total_Stops` text → ordinal 0–4.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::api::logs::log_stage;
use crate::error::{StageError, StageResult};
use crate::models::{columns, TotalStops};
use crate::table::{cell_text, Table};

pub const STAGE: &str = "total_stops";

/// Replace `Total_Stops` phrases with their ordinal, in place.
///
/// A missing value maps to [`TotalStops::MISSING`]; a phrase outside the
/// vocabulary rejects the table.
pub fn map_total_stops(mut table: Table) -> StageResult<Table> {
    let stops = table
        .column_values(STAGE, columns::TOTAL_STOPS)?
        .enumerate()
        .map(|(idx, value)| {
            let text = cell_text(value);
            TotalStops::from_cell(text.as_deref()).ok_or_else(|| StageError::UnrecognizedCategory {
                stage: STAGE.to_string(),
                column: columns::TOTAL_STOPS.to_string(),
                row: idx + 1,
                value: text.unwrap_or_default(),
            })
        })
        .collect::<StageResult<Vec<TotalStops>>>()?;

    let mut counts: BTreeMap<TotalStops, usize> = BTreeMap::new();
    for s in &stops {
        *counts.entry(*s).or_default() += 1;
    }
    for (s, count) in counts {
        log_stage(STAGE, format!("{s}: {count}"));
    }

    let ordinals: Vec<Value> = stops.iter().map(|s| json!(s.ordinal())).collect();
    table.set_column(columns::TOTAL_STOPS, ordinals);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_table;

    #[test]
    fn test_map_vocabulary_and_missing() {
        let table = test_table(&["Total_Stops", "Airline"], &[
            &[json!("non-stop"), json!("IndiGo")],
            &[json!("2 stops"), json!("Jet Airways")],
            &[Value::Null, json!("SpiceJet")],
            &[json!("4 stops"), json!("Air India")],
        ]);

        let out = map_total_stops(table).unwrap();
        assert_eq!(out.columns(), &["Total_Stops", "Airline"]);

        let stops: Vec<i64> = out
            .records()
            .iter()
            .map(|r| r["Total_Stops"].as_i64().unwrap())
            .collect();
        assert_eq!(stops, vec![0, 2, 1, 4]);
    }

    #[test]
    fn test_unknown_phrase_rejected() {
        let table = test_table(&["Total_Stops"], &[&[json!("1 stop")], &[json!("5 stops")]]);

        let err = map_total_stops(table).unwrap_err();
        assert_eq!(
            err,
            StageError::UnrecognizedCategory {
                stage: STAGE.to_string(),
                column: "Total_Stops".to_string(),
                row: 2,
                value: "5 stops".to_string(),
            }
        );
    }

    #[test]
    fn test_logs_stop_distribution() {
        let mut rx = crate::api::logs::LOG_BROADCASTER.subscribe();
        let table = test_table(&["Total_Stops"], &[
            &[json!("2 stops")],
            &[json!("2 stops")],
            &[Value::Null],
        ]);

        map_total_stops(table).unwrap();
        let messages = crate::api::logs::drain_stage(&mut rx, STAGE);
        assert!(messages.contains(&"1 stop: 1".to_string()), "{messages:?}");
        assert!(messages.contains(&"2 stops: 2".to_string()), "{messages:?}");
    }
}
