// src/table.rs

use anyhow::{bail, Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::sync::Arc;

/// Tabular EO BMF data. Columns come from the upstream CSV header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    /// Column names, in CSV order. Duplicates are suffixed `.1`, `.2`, ...
    pub headers: Vec<String>,
    /// One entry per data record. `None` marks a column the record's
    /// source CSV did not have (only produced by [`RecordTable::concat`]).
    pub rows: Vec<Vec<Option<String>>>,
}

impl RecordTable {
    /// Parse a CSV document whose first record is the header.
    ///
    /// Every data record must have exactly as many fields as the header.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let raw_headers = rdr.headers().context("reading CSV header")?.clone();
        if raw_headers.is_empty() {
            bail!("CSV document has no header row");
        }
        let headers = dedupe_headers(raw_headers.iter());

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            // line 1 is the header
            let record = record.with_context(|| format!("parsing CSV record {}", i + 2))?;
            rows.push(record.iter().map(|s| Some(s.to_string())).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Row-wise union. Columns are the union of all inputs in first-seen
    /// order; each input's rows keep their order and are padded with `None`.
    pub fn concat(tables: Vec<RecordTable>) -> RecordTable {
        let mut headers: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for table in &tables {
            for h in &table.headers {
                if !index.contains_key(h) {
                    index.insert(h.clone(), headers.len());
                    headers.push(h.clone());
                }
            }
        }

        let total = tables.iter().map(|t| t.rows.len()).sum();
        let mut rows = Vec::with_capacity(total);
        for table in tables {
            let positions: Vec<usize> = table.headers.iter().map(|h| index[h]).collect();
            if positions.iter().copied().eq(0..headers.len()) {
                rows.extend(table.rows);
                continue;
            }
            for row in table.rows {
                let mut aligned = vec![None; headers.len()];
                for (cell, &pos) in row.into_iter().zip(&positions) {
                    aligned[pos] = cell;
                }
                rows.push(aligned);
            }
        }

        RecordTable { headers, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|c| c.as_deref()))
                .collect(),
        )
    }

    /// Convert into an Arrow batch with one nullable Utf8 column per header.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let columns: Vec<ArrayRef> = (0..self.headers.len())
            .map(|idx| {
                let values = self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).and_then(|c| c.as_deref()));
                Arc::new(StringArray::from_iter(values)) as ArrayRef
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        RecordBatch::try_new_with_options(schema, columns, &options)
            .context("building record batch")
    }
}

fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        while let Some(n) = counts.get_mut(&candidate) {
            *n += 1;
            candidate = format!("{}.{}", name, n);
        }
        counts.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}
