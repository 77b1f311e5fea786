use std::path::Path;

use crate::{
    error::ExportError,
    export::{Table, TableWriter},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableWriter;

impl TableWriter for CsvTableWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(table.header())?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
