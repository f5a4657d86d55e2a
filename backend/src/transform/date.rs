//! Journey date decomposition: `Date_of_Journey` → `Date`, `Month`, `Year`.

use serde_json::{json, Value};

use super::parse_column;
use crate::error::StageResult;
use crate::models::{columns, JourneyDate};
use crate::table::Table;

pub const STAGE: &str = "journey_date";

/// Split `Date_of_Journey` into day, month and year columns.
///
/// Every row must parse; one malformed value rejects the whole table.
pub fn decompose_journey_date(mut table: Table) -> StageResult<Table> {
    let dates = parse_column(&table, STAGE, columns::DATE_OF_JOURNEY, JourneyDate::SHAPE, |raw| {
        JourneyDate::parse(raw)
    })?;

    let (days, (months, years)): (Vec<Value>, (Vec<Value>, Vec<Value>)) = dates
        .iter()
        .map(|d| (json!(d.day), (json!(d.month), json!(d.year))))
        .unzip();

    table.set_column(columns::DATE, days);
    table.set_column(columns::MONTH, months);
    table.set_column(columns::YEAR, years);
    table.drop_column(columns::DATE_OF_JOURNEY);
    Ok(table)
}
