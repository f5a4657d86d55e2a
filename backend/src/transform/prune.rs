//! Removal of source columns that carry no information after cleaning.

use crate::api::logs::log_stage;
use crate::models::columns;
use crate::table::Table;

pub const STAGE: &str = "prune";

/// Columns dropped outright. `Route` duplicates Source, Destination and stops.
pub const PRUNED_COLUMNS: [&str; 1] = [columns::ROUTE];

/// Drop the given columns. Absent columns are ignored, so pruning twice is
/// the same as pruning once.
pub fn prune_columns(mut table: Table, names: &[&str]) -> Table {
    for name in names {
        if table.drop_column(name) {
            log_stage(STAGE, format!("dropped '{name}'"));
        }
    }
    table
}
