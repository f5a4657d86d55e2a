//! High-level pipeline API: load → clean → encode.
//!
//! # Example
//!
//! ```rust,ignore
//! use flightprep::transform::{process_file, PipelineOptions};
//!
//! let output = process_file("Data_Train.xlsx", &PipelineOptions::default())?;
//! println!("{} cleaned rows, {} encoded columns", output.cleaned.len(), output.encoded.width());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::encoder::{one_hot_encode, OneHotEncoding};
use super::stages::Stage;
use crate::api::logs::{log_error, log_info, log_stage, log_success};
use crate::error::{PipelineResult, StageError};
use crate::models::columns;
use crate::parser::{load_bytes, load_file, LoadInfo, LoadedTable};
use crate::table::Table;

/// Stage name used for checks that run before any stage.
pub const LOAD_STAGE: &str = "load";

/// Options for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOptions {
    /// Rows kept in the raw and cleaned previews
    pub preview_rows: usize,

    /// Nominal columns to one-hot encode, in output order
    pub encode_columns: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            encode_columns: columns::NOMINAL.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Loader metadata
    pub load_info: LoadInfo,

    /// First rows of the input, as loaded
    pub raw_preview: Table,

    /// Fully cleaned table
    pub cleaned: Table,

    /// One-hot block computed from `cleaned`
    pub encoded: OneHotEncoding,
}

/// Fail with `MissingColumn` for the first required column the table lacks.
pub fn check_required_columns(table: &Table) -> Result<(), StageError> {
    for column in columns::REQUIRED {
        table.require_column(LOAD_STAGE, column)?;
    }
    Ok(())
}

/// Run every cleaning stage of the default plan, in order.
///
/// A table with a complete header and no rows cleans to an empty table.
pub fn clean_table(table: Table) -> PipelineResult<Table> {
    check_required_columns(&table)?;

    let plan = Stage::default_plan();
    log_info(format!("🧹 Cleaning {} rows through {} stages...", table.len(), plan.len()));

    let mut table = table;
    for stage in &plan {
        table = stage.apply(table).map_err(|e| {
            log_error(e.to_string());
            e
        })?;
        log_stage(stage.name(), stage.description());
    }

    log_success(format!("Cleaned table has {} columns", table.columns().len()));
    Ok(table)
}

/// Process raw file bytes.
pub fn process_bytes(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    log_info("📖 Reading input...");
    let loaded = load_bytes(bytes)?;
    process_loaded(loaded, options)
}

/// Process a file from disk.
pub fn process_file<P: AsRef<Path>>(path: P, options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}...", path.as_ref().display()));
    let loaded = load_file(path)?;
    process_loaded(loaded, options)
}

fn process_loaded(loaded: LoadedTable, options: &PipelineOptions) -> PipelineResult<PipelineOutput> {
    let LoadedTable { table, info } = loaded;
    log_load_info(&info);

    let raw_preview = table.head(options.preview_rows);
    let cleaned = clean_table(table)?;

    let sources: Vec<&str> = options.encode_columns.iter().map(String::as_str).collect();
    let encoded = one_hot_encode(&cleaned, &sources)?;
    log_success(format!(
        "Encoded {} columns into {} indicator columns",
        sources.len(),
        encoded.width()
    ));

    Ok(PipelineOutput {
        load_info: info,
        raw_preview,
        cleaned,
        encoded,
    })
}

fn log_load_info(info: &LoadInfo) {
    if let Some(encoding) = &info.encoding {
        log_success(format!("Detected encoding: {encoding}"));
    }
    if let Some(delimiter) = info.delimiter {
        log_success(format!("Detected separator: '{}'", format_delimiter(delimiter)));
    }
    log_success(format!("Read {} rows, {} columns", info.row_count, info.headers.len()));
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use serde_json::Value;

    const HEADER: &str = "Airline,Date_of_Journey,Source,Destination,Route,Dep_Time,Arrival_Time,Duration,Total_Stops,Additional_Info,Price";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.into_bytes()
    }

    #[test]
    fn test_end_to_end_row() {
        let bytes = csv(&["IndiGo,24/03/2019,Banglore,New Delhi,BLR → DEL,22:20,01:10 22 Mar,2h 50m,non-stop,No info,3897"]);
        let output = process_bytes(&bytes, &PipelineOptions::default()).unwrap();

        let row = &output.cleaned.records()[0];
        assert_eq!(row["Date"], 24);
        assert_eq!(row["Month"], 3);
        assert_eq!(row["Year"], 2019);
        assert_eq!(row["Dept_hour"], 22);
        assert_eq!(row["Dept_min"], 20);
        assert_eq!(row["Arrival_hour"], 1);
        assert_eq!(row["Arrival_min"], 10);
        assert_eq!(row["Dur_hour"], 2);
        assert_eq!(row["Dur_min"], 50);
        assert_eq!(row["Total_Stops"], 0);

        for gone in ["Date_of_Journey", "Dep_Time", "Arrival_Time", "Duration", "Route"] {
            assert!(!output.cleaned.has_column(gone), "{gone} still present");
        }
        assert!(output.cleaned.has_column("Price"));
        assert!(output.cleaned.has_column("Additional_Info"));

        assert_eq!(
            output.encoded.column_names(),
            vec!["Airline_IndiGo", "Source_Banglore", "Destination_New Delhi"]
        );
        assert_eq!(output.encoded.rows, vec![vec![1, 1, 1]]);
    }

    #[test]
    fn test_raw_preview_and_load_info() {
        let rows = [
            "IndiGo,24/03/2019,Banglore,New Delhi,BLR → DEL,22:20,01:10 22 Mar,2h 50m,non-stop,No info,3897",
            "Air India,1/05/2019,Kolkata,Banglore,CCU → BLR,05:50,13:15,7h 25m,2 stops,No info,7662",
            "Jet Airways,9/06/2019,Delhi,Cochin,DEL → BOM → COK,09:25,04:25 10 Jun,19h,2 stops,No info,13882",
        ];
        let options = PipelineOptions { preview_rows: 2, ..Default::default() };
        let output = process_bytes(&csv(&rows), &options).unwrap();

        assert_eq!(output.raw_preview.len(), 2);
        assert!(output.raw_preview.has_column("Date_of_Journey"));
        assert_eq!(output.load_info.row_count, 3);
        assert_eq!(output.load_info.delimiter, Some(','));
        assert_eq!(output.cleaned.len(), 3);
        assert_eq!(output.cleaned.records()[2]["Dur_hour"], 19);
        assert_eq!(output.cleaned.records()[2]["Dur_min"], 0);
    }

    #[test]
    fn test_missing_required_column() {
        let bytes = b"Airline,Date_of_Journey\nIndiGo,24/03/2019\n";
        let err = process_bytes(bytes, &PipelineOptions::default()).unwrap_err();
        match err {
            PipelineError::Stage(stage_err) => {
                assert_eq!(stage_err.stage(), LOAD_STAGE);
                assert_eq!(stage_err.column(), "Arrival_Time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_row_aborts_with_row_number() {
        let rows = [
            "IndiGo,24/03/2019,Banglore,New Delhi,BLR → DEL,22:20,01:10 22 Mar,2h 50m,non-stop,No info,3897",
            "IndiGo,24/03/2019,Banglore,New Delhi,BLR → DEL,22:20,01:10 22 Mar,2h 50m,seven stops,No info,3897",
        ];
        let err = process_bytes(&csv(&rows), &PipelineOptions::default()).unwrap_err();
        match err {
            PipelineError::Stage(StageError::UnrecognizedCategory { row, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "seven stops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_cleans_to_empty_table() {
        let output = process_bytes(&csv(&[]), &PipelineOptions::default()).unwrap();
        assert!(output.cleaned.is_empty());
        assert!(output.cleaned.has_column("Dur_hour"));
        assert!(!output.cleaned.has_column("Route"));
        assert_eq!(output.encoded.width(), 0);
        assert!(output.encoded.rows.is_empty());
    }

    #[test]
    fn test_header_only_still_checks_columns() {
        let err = process_bytes(b"Airline,Date_of_Journey\n", &PipelineOptions::default()).unwrap_err();
        match err {
            PipelineError::Stage(StageError::MissingColumn { stage, column }) => {
                assert_eq!(stage, LOAD_STAGE);
                assert_eq!(column, "Arrival_Time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_table_keeps_extra_columns_untouched() {
        let bytes = csv(&["IndiGo,24/03/2019,Banglore,New Delhi,BLR → DEL,22:20,01:10 22 Mar,2h 50m,non-stop,No info,3897"]);
        let loaded = load_bytes(&bytes).unwrap();
        let cleaned = clean_table(loaded.table).unwrap();
        assert_eq!(cleaned.records()[0]["Additional_Info"], Value::String("No info".into()));
        assert_eq!(cleaned.records()[0]["Price"], Value::String("3897".into()));
    }

    fn workbook() -> Vec<u8> {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date = Format::new().set_num_format("dd/mm/yyyy");
        let clock = Format::new().set_num_format("hh:mm");

        let header = [
            "Airline", "Date_of_Journey", "Source", "Destination", "Route",
            "Dep_Time", "Arrival_Time", "Duration", "Total_Stops", "Price",
        ];
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }

        // Text-typed cells, as in the published training file
        let text = [
            "IndiGo", "24/03/2019", "Banglore", "New Delhi", "BLR → DEL",
            "22:20", "01:10 22 Mar", "2h 50m", "non-stop",
        ];
        for (col, value) in text.iter().enumerate() {
            sheet.write_string(1, col as u16, *value).unwrap();
        }
        sheet.write_number(1, 9, 3897).unwrap();

        // Native date and time cells, empty stop count
        sheet.write_string(2, 0, "Jet Airways").unwrap();
        let journey = ExcelDateTime::from_ymd(2019, 6, 9).unwrap();
        sheet.write_datetime_with_format(2, 1, &journey, &date).unwrap();
        sheet.write_string(2, 2, "Delhi").unwrap();
        sheet.write_string(2, 3, "Cochin").unwrap();
        sheet.write_string(2, 4, "DEL → BOM → COK").unwrap();
        let departure = ExcelDateTime::from_hms(9, 25, 0).unwrap();
        sheet.write_datetime_with_format(2, 5, &departure, &clock).unwrap();
        sheet.write_string(2, 6, "04:25 10 Jun").unwrap();
        sheet.write_string(2, 7, "19h").unwrap();
        sheet.write_number(2, 9, 13882).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_workbook_end_to_end() {
        let output = process_bytes(&workbook(), &PipelineOptions::default()).unwrap();
        assert_eq!(output.load_info.format, crate::parser::SourceFormat::Xlsx);
        assert_eq!(output.load_info.row_count, 2);

        let first = &output.cleaned.records()[0];
        assert_eq!(first["Date"], 24);
        assert_eq!(first["Month"], 3);
        assert_eq!(first["Dept_hour"], 22);
        assert_eq!(first["Arrival_hour"], 1);
        assert_eq!(first["Dur_hour"], 2);
        assert_eq!(first["Dur_min"], 50);
        assert_eq!(first["Total_Stops"], 0);
        assert_eq!(first["Price"], 3897);

        let second = &output.cleaned.records()[1];
        assert_eq!(second["Date"], 9);
        assert_eq!(second["Month"], 6);
        assert_eq!(second["Year"], 2019);
        assert_eq!(second["Dept_hour"], 9);
        assert_eq!(second["Dept_min"], 25);
        assert_eq!(second["Dur_hour"], 19);
        assert_eq!(second["Total_Stops"], 1);
        assert_eq!(second["Price"], 13882);

        assert_eq!(
            output.encoded.column_names(),
            vec![
                "Airline_IndiGo",
                "Airline_Jet Airways",
                "Source_Banglore",
                "Source_Delhi",
                "Destination_Cochin",
                "Destination_New Delhi",
            ]
        );
    }

    #[test]
    fn test_process_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            &csv(&["SpiceJet,18/04/2019,Mumbai,Hyderabad,BOM → HYD,22:45,00:15 19 Apr,1h 30m,,No info,2224"]),
        )
        .unwrap();

        let output = process_file(file.path(), &PipelineOptions::default()).unwrap();
        assert_eq!(output.cleaned.records()[0]["Total_Stops"], 1);
    }
}
