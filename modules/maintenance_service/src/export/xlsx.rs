//! Excel export
//!
//! Layout: bold title (row 0), italic filter labels, a blank row, the
//! grey bordered header row, then data. Subtotals are bold; the grand total
//! is bold with a top border.

use super::{Cell, ReportTable, RowKind};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

const MAX_COLUMN_WIDTH: usize = 60;

pub fn write_xlsx(table: &ReportTable) -> Result<Vec<u8>, XlsxError> {
    let title_format = Format::new().set_bold().set_font_size(14);
    let label_format = Format::new().set_italic();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9D9D9))
        .set_border(FormatBorder::Thin);
    let subtotal_format = Format::new().set_bold();
    let grand_total_format = Format::new()
        .set_bold()
        .set_border_top(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&table.title))?;

    for placed in layout(table) {
        let format = match placed.style {
            Style::Title => Some(&title_format),
            Style::Label => Some(&label_format),
            Style::Header => Some(&header_format),
            Style::Detail => None,
            Style::Subtotal => Some(&subtotal_format),
            Style::GrandTotal => Some(&grand_total_format),
        };
        write_cell(worksheet, placed.row, placed.col, &placed.cell, format)?;
    }

    for (col, width) in table.column_widths().into_iter().enumerate() {
        let width = (width + 2).min(MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save_to_buffer()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Label,
    Header,
    Detail,
    Subtotal,
    GrandTotal,
}

/// A value at its sheet position
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placed {
    row: u32,
    col: u16,
    cell: Cell,
    style: Style,
}

/// Sheet positions of every written value, top to bottom
fn layout(table: &ReportTable) -> Vec<Placed> {
    let mut placed = Vec::new();
    let mut row: u32 = 0;
    placed.push(Placed {
        row,
        col: 0,
        cell: Cell::Text(table.title.clone()),
        style: Style::Title,
    });
    row += 1;

    for label in &table.filter_labels {
        placed.push(Placed {
            row,
            col: 0,
            cell: Cell::Text(label.clone()),
            style: Style::Label,
        });
        row += 1;
    }
    // blank row above the header
    row += 1;

    for (col, header) in table.headers.iter().enumerate() {
        placed.push(Placed {
            row,
            col: col as u16,
            cell: Cell::Text(header.clone()),
            style: Style::Header,
        });
    }
    row += 1;

    for table_row in &table.rows {
        let style = match table_row.kind {
            RowKind::Detail => Style::Detail,
            RowKind::Subtotal { .. } => Style::Subtotal,
            RowKind::GrandTotal => Style::GrandTotal,
        };
        for (col, cell) in table_row.cells.iter().enumerate() {
            placed.push(Placed {
                row,
                col: col as u16,
                cell: cell.clone(),
                style,
            });
        }
        row += 1;
    }
    placed
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    match (cell, format) {
        (Cell::Integer(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n as f64, format)?;
        }
        (Cell::Integer(n), None) => {
            worksheet.write_number(row, col, *n as f64)?;
        }
        (Cell::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (Cell::Empty, None) => {}
        (other, Some(format)) => {
            worksheet.write_string_with_format(row, col, other.display(), format)?;
        }
        (other, None) => {
            worksheet.write_string(row, col, other.display())?;
        }
    }
    Ok(())
}

/// Worksheet names are limited to 31 characters without `[]:*?/\`
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}
