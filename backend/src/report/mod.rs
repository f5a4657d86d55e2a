//! Chart-ready summary of a pipeline run.
//!
//! Collects previews, the airline distribution, Class-vs-Price boxplot
//! statistics and a preview of the encoded block. The same [`Summary`] is
//! rendered as text for the CLI and serialized as JSON for the API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::StageResult;
use crate::models::columns;
use crate::table::{cell_number, cell_text, Table};
use crate::transform::PipelineOutput;

pub const STAGE: &str = "report";

pub const NULL_CLASS_OR_PRICE: &str =
    "'Class' or 'Price' column contains null values. Please check the dataset.";
pub const MISSING_CLASS_OR_PRICE: &str = "Dataset does not contain 'Class' or 'Price' columns.";
pub const NON_NUMERIC_PRICE: &str =
    "'Price' column contains non-numeric values. Please check the dataset.";

/// One bar of the airline distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Five-number summary plus whiskers and outliers for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxplotStats {
    pub class: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxplotStats {
    /// Statistics of a non-empty sample.
    pub fn from_values(class: impl Into<String>, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let q1 = quantile(&values, 0.25);
        let median = quantile(&values, 0.5);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = || values.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);

        Some(Self {
            class: class.into(),
            count: values.len(),
            min: values[0],
            q1,
            median,
            q3,
            max: values[values.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers: values
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect(),
        })
    }
}

/// Quantile of sorted data by linear interpolation between closest ranks.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Class-vs-Price section: either per-class statistics or why there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PriceByClass {
    Ready { groups: Vec<BoxplotStats> },
    Warning { message: String },
}

impl PriceByClass {
    pub fn from_table(table: &Table) -> Self {
        if !table.has_column(columns::CLASS) || !table.has_column(columns::PRICE) {
            return Self::Warning {
                message: MISSING_CLASS_OR_PRICE.to_string(),
            };
        }

        let warning = |message: &str| Self::Warning {
            message: message.to_string(),
        };

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in table.records() {
            let class = row.get(columns::CLASS).and_then(cell_text);
            let price = row.get(columns::PRICE).filter(|v| !v.is_null());
            match (class, price) {
                (Some(class), Some(price)) => match cell_number(price) {
                    Some(price) => groups.entry(class).or_default().push(price),
                    None => return warning(NON_NUMERIC_PRICE),
                },
                _ => return warning(NULL_CLASS_OR_PRICE),
            }
        }

        Self::Ready {
            groups: groups
                .into_iter()
                .filter_map(|(class, values)| BoxplotStats::from_values(class, values))
                .collect(),
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }
}

/// Everything shown after a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub raw_preview: Table,
    pub cleaned_preview: Table,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub airline_distribution: Vec<CategoryCount>,
    pub price_by_class: PriceByClass,
    pub encoded_columns: Vec<String>,
    pub encoded_preview: Table,
}

/// Build the summary of a pipeline run.
pub fn build_summary(output: &PipelineOutput, preview_rows: usize) -> StageResult<Summary> {
    let cleaned = &output.cleaned;

    let airline_distribution = cleaned
        .value_counts(STAGE, columns::AIRLINE)?
        .into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect();

    Ok(Summary {
        raw_preview: output.raw_preview.head(preview_rows),
        cleaned_preview: cleaned.head(preview_rows),
        row_count: cleaned.len(),
        columns: cleaned.columns().to_vec(),
        airline_distribution,
        price_by_class: PriceByClass::from_table(cleaned),
        encoded_columns: output.encoded.column_names(),
        encoded_preview: output.encoded.to_table().head(preview_rows),
    })
}

impl Summary {
    /// Plain-text report for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        section(&mut out, "Raw data (first rows)");
        out.push_str(&render_table(&self.raw_preview));

        section(&mut out, "Cleaned data (first rows)");
        out.push_str(&render_table(&self.cleaned_preview));

        section(&mut out, &format!("Columns ({} rows)", self.row_count));
        for (i, col) in self.columns.iter().enumerate() {
            let _ = writeln!(out, "[{:2}] {}", i + 1, col);
        }

        section(&mut out, "Airline distribution");
        let width = self
            .airline_distribution
            .iter()
            .map(|c| c.value.chars().count())
            .max()
            .unwrap_or(0);
        for entry in &self.airline_distribution {
            let _ = writeln!(out, "{:<width$}  {}", entry.value, entry.count);
        }

        section(&mut out, "Price by class");
        match &self.price_by_class {
            PriceByClass::Ready { groups } => {
                for g in groups {
                    let _ = writeln!(
                        out,
                        "{}: n={} min={} q1={} median={} q3={} max={} whiskers=[{}, {}] outliers={}",
                        g.class,
                        g.count,
                        g.min,
                        g.q1,
                        g.median,
                        g.q3,
                        g.max,
                        g.lower_whisker,
                        g.upper_whisker,
                        g.outliers.len()
                    );
                }
            }
            PriceByClass::Warning { message } => {
                let _ = writeln!(out, "⚠️  {message}");
            }
        }

        section(
            &mut out,
            &format!("One-hot encoded ({} columns)", self.encoded_columns.len()),
        );
        out.push_str(&render_table(&self.encoded_preview));
        out
    }
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{title}\n{}", "=".repeat(title.chars().count()));
}

/// Pipe-separated grid, nulls shown as `NaN`.
fn render_table(table: &Table) -> String {
    let mut out = table.columns().join(" | ");
    out.push('\n');
    for row in table.records() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| row.get(c).and_then(cell_text).unwrap_or_else(|| "NaN".to_string()))
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{process_bytes, PipelineOptions};
    use serde_json::{json, Value};

    fn priced(rows: &[(&str, Value)]) -> Table {
        let records = rows
            .iter()
            .map(|(class, price)| {
                let mut row = serde_json::Map::new();
                row.insert("Class".into(), json!(class));
                row.insert("Price".into(), price.clone());
                row
            })
            .collect();
        Table::from_records(vec!["Class".into(), "Price".into()], records)
    }

    #[test]
    fn test_boxplot_stats() {
        let stats = BoxplotStats::from_values("Economy", vec![100.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn test_price_by_class_groups_sorted() {
        let table = priced(&[
            ("Economy", json!("3897")),
            ("Business", json!(52000)),
            ("Economy", json!("7662")),
        ]);
        match PriceByClass::from_table(&table) {
            PriceByClass::Ready { groups } => {
                let classes: Vec<&str> = groups.iter().map(|g| g.class.as_str()).collect();
                assert_eq!(classes, vec!["Business", "Economy"]);
                assert_eq!(groups[1].count, 2);
                assert_eq!(groups[1].median, (3897.0 + 7662.0) / 2.0);
            }
            other => panic!("expected statistics, got {other:?}"),
        }
    }

    #[test]
    fn test_price_by_class_warnings() {
        let with_null = priced(&[("Economy", json!("3897")), ("Economy", Value::Null)]);
        assert_eq!(
            PriceByClass::from_table(&with_null),
            PriceByClass::Warning { message: NULL_CLASS_OR_PRICE.to_string() }
        );

        let text_price = priced(&[("Economy", json!("3897")), ("Business", json!("on request"))]);
        assert_eq!(
            PriceByClass::from_table(&text_price),
            PriceByClass::Warning { message: NON_NUMERIC_PRICE.to_string() }
        );

        let no_class = Table::new(vec!["Price".into()]);
        assert_eq!(
            PriceByClass::from_table(&no_class),
            PriceByClass::Warning { message: MISSING_CLASS_OR_PRICE.to_string() }
        );
    }

    #[test]
    fn test_warning_serializes_with_status() {
        let section = PriceByClass::Warning { message: MISSING_CLASS_OR_PRICE.to_string() };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["message"], MISSING_CLASS_OR_PRICE);
    }

    #[test]
    fn test_build_summary_from_run() {
        let bytes = "Airline,Date_of_Journey,Source,Destination,Route,Dep_Time,Arrival_Time,Duration,Total_Stops,Price\n\
            IndiGo,24/03/2019,Banglore,New Delhi,BLR-DEL,22:20,01:10 22 Mar,2h 50m,non-stop,3897\n\
            Air India,1/05/2019,Kolkata,Banglore,CCU-BLR,05:50,13:15,7h 25m,2 stops,7662\n\
            IndiGo,9/06/2019,Delhi,Cochin,DEL-COK,09:25,04:25 10 Jun,19h,2 stops,13882\n";
        let output = process_bytes(bytes.as_bytes(), &PipelineOptions::default()).unwrap();
        let summary = build_summary(&output, 2).unwrap();

        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.cleaned_preview.len(), 2);
        assert_eq!(summary.encoded_preview.len(), 2);
        assert_eq!(
            summary.airline_distribution,
            vec![
                CategoryCount { value: "IndiGo".into(), count: 2 },
                CategoryCount { value: "Air India".into(), count: 1 },
            ]
        );
        assert!(summary.price_by_class.is_warning());

        let text = summary.render_text();
        assert!(text.contains("Airline distribution"));
        assert!(text.contains(MISSING_CLASS_OR_PRICE));
        assert!(text.contains("Airline_IndiGo"));
    }

    #[test]
    fn test_render_table_shows_nan() {
        let table = priced(&[("Economy", Value::Null)]);
        assert_eq!(render_table(&table), "Class | Price\nEconomy | NaN\n");
    }
}
