//! One-hot encoding of nominal columns.
//!
//! The vocabulary is derived from the table on every call; nothing is fitted
//! or kept between calls, so every category seen at encode time is known.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashSet};

use crate::error::StageResult;
use crate::table::{cell_text, Table};

pub const STAGE: &str = "one_hot";

/// Category name used for null cells.
pub const MISSING_CATEGORY: &str = "nan";

/// Vocabulary of one encoded source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFeature {
    pub source: String,
    /// Observed values in ascending order, then [`MISSING_CATEGORY`] if any cell was null
    pub categories: Vec<String>,
    #[serde(skip)]
    has_missing: bool,
}

impl EncodedFeature {
    fn index_of(&self, value: Option<&str>) -> Option<usize> {
        match value {
            Some(v) => self.categories[..self.observed_len()]
                .binary_search_by(|c| c.as_str().cmp(v))
                .ok(),
            None if self.has_missing => Some(self.categories.len() - 1),
            None => None,
        }
    }

    fn observed_len(&self) -> usize {
        self.categories.len() - usize::from(self.has_missing)
    }

    /// Output column names, `<source>_<value>`.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(move |category| format!("{}_{}", self.source, category))
    }
}

/// The encoded block: one 0/1 column per observed category, grouped by
/// source column in the requested order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneHotEncoding {
    pub features: Vec<EncodedFeature>,
    pub rows: Vec<Vec<u8>>,
}

impl OneHotEncoding {
    /// Every output column name, in block order.
    pub fn column_names(&self) -> Vec<String> {
        self.features.iter().flat_map(|f| f.column_names()).collect()
    }

    pub fn width(&self) -> usize {
        self.features.iter().map(|f| f.categories.len()).sum()
    }

    /// The slice of `row` that belongs to `source`.
    pub fn segment(&self, row: usize, source: &str) -> Option<&[u8]> {
        let mut offset = 0;
        for feature in &self.features {
            let width = feature.categories.len();
            if feature.source == source {
                return self.rows.get(row).map(|r| &r[offset..offset + width]);
            }
            offset += width;
        }
        None
    }

    /// The block as a table of integer columns.
    pub fn to_table(&self) -> Table {
        let names = self.column_names();
        let records = self
            .rows
            .iter()
            .map(|bits| {
                names
                    .iter()
                    .zip(bits)
                    .map(|(name, bit)| (name.clone(), json!(bit)))
                    .collect::<Map<String, Value>>()
            })
            .collect();
        Table::from_records(names, records)
    }
}

/// One-hot encode `sources` of `table`.
///
/// Categories within a source are ordered by byte-wise comparison of their
/// text, which keeps the column order reproducible. A source listed twice is
/// encoded once, at its first position.
pub fn one_hot_encode(table: &Table, sources: &[&str]) -> StageResult<OneHotEncoding> {
    let mut seen = HashSet::new();
    let sources: Vec<&str> = sources.iter().copied().filter(|s| seen.insert(*s)).collect();

    let mut features = Vec::with_capacity(sources.len());
    let mut cells: Vec<Vec<Option<String>>> = Vec::with_capacity(sources.len());

    for &source in &sources {
        let values: Vec<Option<String>> = table.column_values(STAGE, source)?.map(cell_text).collect();

        let observed: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
        let has_missing = values.iter().any(Option::is_none);

        let mut categories: Vec<String> = observed.into_iter().map(str::to_string).collect();
        if has_missing {
            categories.push(MISSING_CATEGORY.to_string());
        }

        features.push(EncodedFeature {
            source: source.to_string(),
            categories,
            has_missing,
        });
        cells.push(values);
    }

    let width: usize = features.iter().map(|f| f.categories.len()).sum();
    let rows = (0..table.len())
        .map(|row| {
            let mut bits = vec![0u8; width];
            let mut offset = 0;
            for (feature, values) in features.iter().zip(&cells) {
                if let Some(idx) = feature.index_of(values[row].as_deref()) {
                    bits[offset + idx] = 1;
                }
                offset += feature.categories.len();
            }
            bits
        })
        .collect();

    Ok(OneHotEncoding { features, rows })
}
