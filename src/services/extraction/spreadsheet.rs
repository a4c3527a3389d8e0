//! Spreadsheet Extractor
//!
//! Loads a tabular file, summarizes its structure (row/column counts,
//! header names, inferred column types), renders the table to text, and
//! delegates the rendering to the text extractor. The structural summary is
//! merged under `document_summary` alongside the text analysis.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::models::{AnalysisRecord, Modality, TableSummary};
use crate::utils::error::{AppError, AppResult};

use super::text::TextExtractor;
use super::{Extractor, MessagePayload};

/// Maximum data rows rendered into the text sent for analysis
const MAX_RENDERED_ROWS: usize = 100;

/// Tabular analysis over workbook files
pub struct SpreadsheetExtractor {
    text: Arc<TextExtractor>,
}

impl SpreadsheetExtractor {
    /// Create a spreadsheet extractor delegating rendered tables to `text`
    pub fn new(text: Arc<TextExtractor>) -> Self {
        Self { text }
    }
}

/// Header names from the first row; blank headers get positional names
fn column_names(rows: &[Vec<Data>]) -> Vec<String> {
    let Some(header) = rows.first() else {
        return Vec::new();
    };
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect()
}

/// Type tag for a single cell, `None` for empty cells
fn cell_type(cell: &Data) -> Option<&'static str> {
    match cell {
        Data::Empty => None,
        Data::Int(_) => Some("integer"),
        Data::Float(_) => Some("float"),
        Data::String(_) => Some("string"),
        Data::Bool(_) => Some("boolean"),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => Some("datetime"),
        Data::Error(_) => Some("error"),
    }
}

/// Inferred type of one column over the data rows
fn column_type(rows: &[Vec<Data>], column: usize) -> &'static str {
    let mut seen: Option<&'static str> = None;
    for row in rows.iter().skip(1) {
        let Some(tag) = row.get(column).and_then(cell_type) else {
            continue;
        };
        match seen {
            None => seen = Some(tag),
            Some(prev) if prev == tag => {}
            // Integer and float columns commonly mix; treat as float
            Some("integer") if tag == "float" => seen = Some("float"),
            Some("float") if tag == "integer" => {}
            Some(_) => return "mixed",
        }
    }
    seen.unwrap_or("empty")
}

/// Structural summary of the loaded worksheet
fn summarize(rows: &[Vec<Data>]) -> TableSummary {
    let names = column_names(rows);
    let mut column_types = BTreeMap::new();
    for (i, name) in names.iter().enumerate() {
        column_types.insert(name.clone(), column_type(rows, i).to_string());
    }

    TableSummary {
        rows: rows.len().saturating_sub(1),
        columns: names.len(),
        column_names: names,
        column_types,
    }
}

/// Render the table as aligned text for the analysis contract
fn render_table(rows: &[Vec<Data>]) -> String {
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .take(MAX_RENDERED_ROWS + 1)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    if rendered.is_empty() {
        return "(empty sheet)".to_string();
    }

    let num_cols = rendered.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut col_widths = vec![3usize; num_cols];
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.len());
        }
    }

    let mut output = String::new();
    for (row_idx, row) in rendered.iter().enumerate() {
        output.push('|');
        for (i, width) in col_widths.iter().enumerate() {
            let cell = row.get(i).map(|s| s.as_str()).unwrap_or("");
            output.push_str(&format!(" {:width$} |", cell, width = width));
        }
        output.push('\n');

        if row_idx == 0 {
            output.push('|');
            for width in &col_widths {
                output.push_str(&format!(" {} |", "-".repeat(*width)));
            }
            output.push('\n');
        }
    }

    if rows.len() > MAX_RENDERED_ROWS + 1 {
        output.push_str(&format!(
            "\n... ({} more rows not shown)\n",
            rows.len() - MAX_RENDERED_ROWS - 1
        ));
    }

    output
}

#[async_trait]
impl Extractor for SpreadsheetExtractor {
    fn modality(&self) -> Modality {
        Modality::Excel
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| AppError::extraction(format!("failed to open spreadsheet: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::extraction("workbook has no sheets"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| AppError::extraction(format!("failed to read sheet: {}", e)))?;

        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

        let document_summary = summarize(&rows);
        let rendered = render_table(&rows);

        debug!(
            sheet = %sheet_name,
            rows = document_summary.rows,
            columns = document_summary.columns,
            "spreadsheet loaded"
        );

        let analysis = self.text.analyze_text(&rendered).await?;

        Ok(AnalysisRecord::Spreadsheet {
            document_summary,
            analysis,
        })
    }
}
