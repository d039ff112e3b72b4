//! Report table model and file exports (Excel, PDF, CSV)
//!
//! Every export follows the same layout: a title row, one row per active
//! filter label, a blank row, the header row and then the data rows.

pub mod csv;
pub mod pdf;
pub mod xlsx;

use crate::contract::MaintenanceError;
use chrono::NaiveDate;
use std::str::FromStr;

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    /// Text shown in the grid and written to text-based exports
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Detail,
    Subtotal { depth: usize },
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

/// A rendered report: what the grid shows and what gets exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub filter_labels: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ReportTable {
    /// Widest display text per column, headers included
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (col, cell) in row.cells.iter().enumerate() {
                let len = cell.display().chars().count();
                match widths.get_mut(col) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }
}

/// Downloadable export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }

    /// Attachment name, e.g. `services_done_2024-01-01_2024-01-31.xlsx`
    pub fn file_name(self, stem: &str) -> String {
        let stem: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{}.{}", stem, self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = MaintenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            other => Err(MaintenanceError::validation(format!(
                "Unsupported export format '{}'",
                other
            ))),
        }
    }
}

/// Render a report table to the requested file format
pub fn render(table: &ReportTable, format: ExportFormat) -> Result<Vec<u8>, MaintenanceError> {
    let result = match format {
        ExportFormat::Xlsx => xlsx::write_xlsx(table).map_err(anyhow::Error::from),
        ExportFormat::Pdf => pdf::write_pdf(table),
        ExportFormat::Csv => self::csv::write_csv(table),
    };
    result.map_err(|e| {
        tracing::error!(title = %table.title, ?format, "report export failed: {:#}", e);
        MaintenanceError::Export {
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
pub(crate) fn sample_table() -> ReportTable {
    ReportTable {
        title: "MineTrack - Services Done".to_string(),
        filter_labels: vec!["Period: 2024-01-01 to 2024-01-31".to_string()],
        headers: vec!["Date".to_string(), "Serial No".to_string(), "Qty".to_string()],
        rows: vec![
            TableRow {
                kind: RowKind::Detail,
                cells: vec![
                    Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap_or_default()),
                    "LHD-001".into(),
                    Cell::Integer(2),
                ],
            },
            TableRow {
                kind: RowKind::Subtotal { depth: 0 },
                cells: vec!["Total Mine: Kopanang".into(), Cell::Empty, Cell::Integer(2)],
            },
            TableRow {
                kind: RowKind::GrandTotal,
                cells: vec!["Grand Total".into(), Cell::Empty, Cell::Integer(2)],
            },
        ],
    }
}
