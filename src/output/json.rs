//! JSON export of the flat record list

use crate::crawler::ProductRecord;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every record as a pretty-printed JSON array
pub fn write_json_records(records: &[ProductRecord], output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!(
        "Wrote {} record(s) to {}",
        records.len(),
        output_path.display()
    );
    Ok(())
}
