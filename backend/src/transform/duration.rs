//! Duration normalization: free-text `Duration` → `Dur_hour`, `Dur_min`.

use serde_json::{json, Value};

use crate::api::logs::log_stage;
use crate::error::StageResult;
use crate::models::{columns, FlightDuration};
use crate::table::{cell_text, Table};

pub const STAGE: &str = "duration";

/// Normalize `Duration` into hour and minute columns.
///
/// Missing values and missing halves default to zero; this stage only fails
/// when the column itself is absent.
pub fn normalize_duration(mut table: Table) -> StageResult<Table> {
    let durations: Vec<FlightDuration> = table
        .column_values(STAGE, columns::DURATION)?
        .map(|value| FlightDuration::normalize(cell_text(value).as_deref()))
        .collect();

    let (hours, minutes): (Vec<Value>, Vec<Value>) = durations
        .iter()
        .map(|d| (json!(d.hours), json!(d.minutes)))
        .unzip();

    if let Some(longest) = durations.iter().map(FlightDuration::total_minutes).max() {
        log_stage(STAGE, format!("longest flight {longest} min"));
    }

    table.set_column(columns::DUR_HOUR, hours);
    table.set_column(columns::DUR_MIN, minutes);
    table.drop_column(columns::DURATION);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_table;

    #[test]
    fn test_normalize_mixed_durations() {
        let table = test_table(&["Duration"], &[
            &[json!("2h 50m")],
            &[json!("2h")],
            &[json!("50m")],
            &[Value::Null],
            &[json!("  19h 5m ")],
        ]);

        let out = normalize_duration(table).unwrap();
        assert_eq!(out.columns(), &["Dur_hour", "Dur_min"]);

        let pairs: Vec<(i64, i64)> = out
            .records()
            .iter()
            .map(|r| (r["Dur_hour"].as_i64().unwrap(), r["Dur_min"].as_i64().unwrap()))
            .collect();
        assert_eq!(pairs, vec![(2, 50), (2, 0), (0, 50), (0, 0), (19, 5)]);
    }

    #[test]
    fn test_missing_duration_column() {
        let table = test_table(&["Airline"], &[&[json!("IndiGo")]]);
        assert!(normalize_duration(table).is_err());
    }

    #[test]
    fn test_logs_longest_flight() {
        let mut rx = crate::api::logs::LOG_BROADCASTER.subscribe();
        let table = test_table(&["Duration"], &[&[json!("2h 50m")], &[json!("47h 5m")], &[Value::Null]]);

        normalize_duration(table).unwrap();
        let messages = crate::api::logs::drain_stage(&mut rx, STAGE);
        assert!(messages.contains(&"longest flight 2825 min".to_string()), "{messages:?}");
    }
}
