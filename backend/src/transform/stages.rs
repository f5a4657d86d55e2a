//! The cleaning plan: an ordered list of named stages.

use serde::{Deserialize, Serialize};

use super::{date, duration, prune, stops, time};
use crate::error::StageResult;
use crate::models::columns;
use crate::table::Table;

/// One step of the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    /// `Date_of_Journey` → `Date`, `Month`, `Year`
    JourneyDate,

    /// `Arrival_Time` → `Arrival_hour`, `Arrival_min`
    ArrivalTime,

    /// `Dep_Time` → `Dept_hour`, `Dept_min`
    DepartureTime,

    /// Drop columns that are redundant after cleaning
    Prune { columns: Vec<String> },

    /// `Duration` → `Dur_hour`, `Dur_min`
    Duration,

    /// `Total_Stops` phrase → ordinal
    TotalStops,
}

impl Stage {
    /// The standard plan, in execution order.
    pub fn default_plan() -> Vec<Stage> {
        vec![
            Stage::JourneyDate,
            Stage::ArrivalTime,
            Stage::DepartureTime,
            Stage::Prune {
                columns: prune::PRUNED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            },
            Stage::Duration,
            Stage::TotalStops,
        ]
    }

    /// Stage name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::JourneyDate => date::STAGE,
            Stage::ArrivalTime => time::ARRIVAL_STAGE,
            Stage::DepartureTime => time::DEPARTURE_STAGE,
            Stage::Prune { .. } => prune::STAGE,
            Stage::Duration => duration::STAGE,
            Stage::TotalStops => stops::STAGE,
        }
    }

    /// Run the stage, consuming the table.
    pub fn apply(&self, table: Table) -> StageResult<Table> {
        match self {
            Stage::JourneyDate => date::decompose_journey_date(table),
            Stage::ArrivalTime => time::decompose_arrival_time(table),
            Stage::DepartureTime => time::decompose_departure_time(table),
            Stage::Prune { columns } => {
                let names: Vec<&str> = columns.iter().map(String::as_str).collect();
                Ok(prune::prune_columns(table, &names))
            }
            Stage::Duration => duration::normalize_duration(table),
            Stage::TotalStops => stops::map_total_stops(table),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Stage::JourneyDate => "split D/M/Y into Date, Month, Year".to_string(),
            Stage::ArrivalTime => {
                "split leading H:M into Arrival_hour, Arrival_min (date suffix ignored)".to_string()
            }
            Stage::DepartureTime => "split strict H:M into Dept_hour, Dept_min".to_string(),
            Stage::Prune { columns } => format!("drop {}", columns.join(", ")),
            Stage::Duration => {
                "normalize '2h 50m' / '2h' / '50m' / missing into Dur_hour, Dur_min".to_string()
            }
            Stage::TotalStops => {
                "map non-stop/N stops to 0-4, missing to 1, anything else is an error".to_string()
            }
        }
    }
}

/// Human-readable listing of the default plan.
pub fn describe_stages() -> String {
    let mut out = String::from("Cleaning stages, in order:\n\n");
    for (i, stage) in Stage::default_plan().iter().enumerate() {
        out.push_str(&format!("{:>2}. {:<15} {}\n", i + 1, stage.name(), stage.description()));
    }
    out.push_str(&format!(
        "\nOne-hot encoded afterwards: {}\n",
        columns::NOMINAL.join(", ")
    ));
    out
}
