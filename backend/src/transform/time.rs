//! Clock time decomposition for arrival and departure columns.

use serde_json::{json, Value};

use super::parse_column;
use crate::error::StageResult;
use crate::models::{columns, ClockTime};
use crate::table::Table;

pub const ARRIVAL_STAGE: &str = "arrival_time";
pub const DEPARTURE_STAGE: &str = "departure_time";

/// `Arrival_Time` (`"H:M"` plus an optional date fragment) → `Arrival_hour`, `Arrival_min`.
pub fn decompose_arrival_time(table: Table) -> StageResult<Table> {
    decompose(
        table,
        ARRIVAL_STAGE,
        columns::ARRIVAL_TIME,
        ClockTime::ARRIVAL_SHAPE,
        ClockTime::parse_leading,
        (columns::ARRIVAL_HOUR, columns::ARRIVAL_MIN),
    )
}

/// `Dep_Time` (strict `"H:M"`) → `Dept_hour`, `Dept_min`.
pub fn decompose_departure_time(table: Table) -> StageResult<Table> {
    decompose(
        table,
        DEPARTURE_STAGE,
        columns::DEP_TIME,
        ClockTime::SHAPE,
        ClockTime::parse,
        (columns::DEPT_HOUR, columns::DEPT_MIN),
    )
}

fn decompose(
    mut table: Table,
    stage: &str,
    source: &str,
    shape: &str,
    parse: fn(&str) -> Result<ClockTime, crate::models::ShapeError>,
    (hour_column, minute_column): (&str, &str),
) -> StageResult<Table> {
    let times = parse_column(&table, stage, source, shape, parse)?;

    let (hours, minutes): (Vec<Value>, Vec<Value>) =
        times.iter().map(|t| (json!(t.hour), json!(t.minute))).unzip();

    table.set_column(hour_column, hours);
    table.set_column(minute_column, minutes);
    table.drop_column(source);
    Ok(table)
}
