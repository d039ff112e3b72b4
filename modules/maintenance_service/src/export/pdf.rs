//! PDF export: A4 landscape, Helvetica, header row repeated on every page

use super::{ReportTable, RowKind};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const LINE_HEIGHT: f32 = 5.5;
const TITLE_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 8.0;
/// Average Helvetica glyph width at `TEXT_SIZE`
const CHAR_WIDTH: f32 = 1.6;
const SUBTOTAL_INDENT: f32 = 3.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub fn write_pdf(table: &ReportTable) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        table.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("loading Helvetica: {:?}", e))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("loading Helvetica-Bold: {:?}", e))?,
    };

    let columns = column_positions(table);
    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    current.use_text(table.title.as_str(), TITLE_SIZE, Mm(MARGIN), Mm(y), &fonts.bold);
    y -= LINE_HEIGHT * 1.5;
    for label in &table.filter_labels {
        current.use_text(label.as_str(), TEXT_SIZE, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= LINE_HEIGHT;
    }
    y -= LINE_HEIGHT;
    draw_header(&current, table, &columns, y, &fonts);
    y -= LINE_HEIGHT;

    for row in &table.rows {
        if y < MARGIN {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_header(&current, table, &columns, y, &fonts);
            y -= LINE_HEIGHT;
        }

        let (font, indent) = match row.kind {
            RowKind::Detail => (&fonts.regular, 0.0),
            RowKind::Subtotal { depth } => (&fonts.bold, SUBTOTAL_INDENT * depth as f32),
            RowKind::GrandTotal => (&fonts.bold, 0.0),
        };
        for (col, cell) in row.cells.iter().enumerate() {
            let Some(&(x, width)) = columns.get(col) else {
                continue;
            };
            let x = if col == 0 { x + indent } else { x };
            let text = fit(&cell.display(), width);
            if !text.is_empty() {
                current.use_text(text, TEXT_SIZE, Mm(x), Mm(y), font);
            }
        }
        y -= LINE_HEIGHT;
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("writing PDF: {:?}", e))
}

fn draw_header(
    layer: &PdfLayerReference,
    table: &ReportTable,
    columns: &[(f32, f32)],
    y: f32,
    fonts: &Fonts,
) {
    for (header, &(x, width)) in table.headers.iter().zip(columns) {
        layer.use_text(fit(header, width), TEXT_SIZE, Mm(x), Mm(y), &fonts.bold);
    }
}

/// `(x, width)` per column, widths proportional to content
fn column_positions(table: &ReportTable) -> Vec<(f32, f32)> {
    let widths: Vec<f32> = table
        .column_widths()
        .into_iter()
        .map(|w| w.clamp(4, 40) as f32)
        .collect();
    let total: f32 = widths.iter().sum();
    if total == 0.0 {
        return Vec::new();
    }
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let mut x = MARGIN;
    widths
        .into_iter()
        .map(|w| {
            let width = usable * w / total;
            let position = (x, width);
            x += width;
            position
        })
        .collect()
}

/// Truncate text so it fits in a column of `width` millimetres
fn fit(text: &str, width: f32) -> String {
    let max_chars = ((width - 1.0) / CHAR_WIDTH).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('~');
    out
}
