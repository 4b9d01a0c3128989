//! CSV export of result tables

use crate::{norm::DATE_FORMAT, table::Table, Result};
use anyhow::Context;
use csv_async::AsyncWriter;
use tokio::io::AsyncWrite;

/// Write a table as CSV, with a header line
///
/// Undated rows get an empty date field.
pub async fn write_csv<W: AsyncWrite + Unpin>(table: &Table, writer: &mut W) -> Result<()> {
    let mut csv = AsyncWriter::from_writer(writer);
    csv.write_record(table.column_names())
        .await
        .context("writing CSV header")?;
    for row in table.rows() {
        let date = row
            .date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let mut record = vec![
            row.ngram.to_string(),
            date,
            row.frequency.to_string(),
            row.frequency_ppm.to_string(),
        ];
        if table.resolved_layer().is_some() {
            record.push(row.resolved.as_deref().unwrap_or_default().to_owned());
        }
        csv.write_record(&record)
            .await
            .with_context(|| format!("writing CSV record for {row:?}"))?;
    }
    csv.flush().await.context("flushing CSV output")?;
    Ok(())
}
