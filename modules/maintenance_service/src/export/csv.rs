//! CSV export

use super::ReportTable;

pub fn write_csv(table: &ReportTable) -> anyhow::Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record([&table.title])?;
    for label in &table.filter_labels {
        writer.write_record([label])?;
    }
    writer.write_record([""])?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.display()))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV output: {}", e))
}
