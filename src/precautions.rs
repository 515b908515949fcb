//! Precaution reference table.
//!
//! Parsed from a CSV with header columns
//! `Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4`. Each row
//! maps a disease name to up to four ordered precaution strings; empty or
//! missing cells are absent slots. Lookup is exact-match on the disease name
//! and returns the first matching row when the table carries duplicates.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

/// Error type for precaution-table loading.
#[derive(Debug, thiserror::Error)]
pub enum PrecautionError {
    #[error("failed to read precaution table: {0}")]
    Io(#[from] io::Error),

    #[error("malformed precaution table: {0}")]
    Csv(#[from] csv::Error),

    #[error("empty disease name in precaution table record {record}")]
    EmptyDisease { record: usize },
}

/// One table row: a disease and its ordered precaution slots.
///
/// Slot order follows the CSV column order and is preserved in output.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecautionRecord {
    disease: String,
    precautions: [Option<String>; 4],
}

impl PrecautionRecord {
    /// Build a record directly (fixtures and tests; loading goes through
    /// [`PrecautionTable`]).
    pub fn new(disease: impl Into<String>, precautions: [Option<String>; 4]) -> Self {
        Self {
            disease: disease.into(),
            precautions,
        }
    }

    /// The disease name this row keys on.
    #[inline]
    pub fn disease(&self) -> &str {
        &self.disease
    }

    /// The raw slots in column order, absent cells included.
    #[inline]
    pub fn slots(&self) -> &[Option<String>; 4] {
        &self.precautions
    }

    /// Present precaution strings in column order, absent slots skipped.
    pub fn present(&self) -> impl Iterator<Item = &str> + '_ {
        self.precautions.iter().filter_map(|p| p.as_deref())
    }
}

/// CSV row shape. Trailing cells may be missing entirely, hence the defaults.
#[derive(Debug, serde::Deserialize)]
struct RawRow {
    #[serde(rename = "Disease")]
    disease: String,
    #[serde(rename = "Precaution_1", default)]
    precaution_1: Option<String>,
    #[serde(rename = "Precaution_2", default)]
    precaution_2: Option<String>,
    #[serde(rename = "Precaution_3", default)]
    precaution_3: Option<String>,
    #[serde(rename = "Precaution_4", default)]
    precaution_4: Option<String>,
}

/// Whitespace-only cells count as absent; kept values are trimmed.
fn clean_cell(cell: Option<String>) -> Option<String> {
    let cell = cell?;
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// In-memory precaution table with first-match duplicate semantics.
#[derive(Debug, Clone)]
pub struct PrecautionTable {
    /// All rows in file order, duplicates included.
    rows: Vec<PrecautionRecord>,
    /// Disease name → index of the FIRST row with that name.
    by_disease: HashMap<String, usize>,
    /// Number of rows shadowed by an earlier row with the same name.
    duplicate_rows: usize,
}

impl PrecautionTable {
    /// Load a table from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PrecautionError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Load a table from any CSV reader.
    ///
    /// The header row is required. Duplicate disease names are retained but
    /// shadowed (first row wins) and reported through a warning log; they are
    /// not a load failure because reference data in the wild carries them.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, PrecautionError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let mut rows = Vec::new();
        let mut by_disease: HashMap<String, usize> = HashMap::new();
        let mut duplicate_rows = 0;

        for (record, result) in rdr.deserialize().enumerate() {
            let raw: RawRow = result?;
            if raw.disease.trim().is_empty() {
                return Err(PrecautionError::EmptyDisease { record });
            }

            let row = PrecautionRecord {
                disease: raw.disease,
                precautions: [
                    clean_cell(raw.precaution_1),
                    clean_cell(raw.precaution_2),
                    clean_cell(raw.precaution_3),
                    clean_cell(raw.precaution_4),
                ],
            };

            let index = rows.len();
            if by_disease.contains_key(row.disease()) {
                duplicate_rows += 1;
            } else {
                by_disease.insert(row.disease.clone(), index);
            }
            rows.push(row);
        }

        if duplicate_rows > 0 {
            tracing::warn!(
                "precaution table has {} duplicate disease row(s); first row wins",
                duplicate_rows
            );
        }

        Ok(Self {
            rows,
            by_disease,
            duplicate_rows,
        })
    }

    /// Build a table from already-validated records (fixtures and tests).
    pub fn from_records(records: Vec<PrecautionRecord>) -> Self {
        let mut by_disease = HashMap::new();
        let mut duplicate_rows = 0;
        for (index, row) in records.iter().enumerate() {
            if by_disease.contains_key(row.disease()) {
                duplicate_rows += 1;
            } else {
                by_disease.insert(row.disease.clone(), index);
            }
        }
        Self {
            rows: records,
            by_disease,
            duplicate_rows,
        }
    }

    /// Total row count, shadowed duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row for a disease name (exact match), if any.
    #[inline]
    pub fn get(&self, disease: &str) -> Option<&PrecautionRecord> {
        self.by_disease.get(disease).map(|&i| &self.rows[i])
    }

    /// Whether a disease has at least one row.
    #[inline]
    pub fn contains(&self, disease: &str) -> bool {
        self.by_disease.contains_key(disease)
    }

    /// Number of rows shadowed by an earlier row with the same disease name.
    #[inline]
    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }
}
