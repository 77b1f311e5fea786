use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::{
    error::ExportError,
    export::{Table, TableWriter},
};

pub const SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTableWriter;

impl TableWriter for XlsxTableWriter {
    fn write(&self, table: &Table, path: &Path) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, name) in table.header().iter().enumerate() {
            worksheet.write_string(0, col as u16, *name)?;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_string(r, 0, row[0].as_str())?;
            worksheet.write_string(r, 1, row[1].as_str())?;
        }

        workbook.save(path)?;
        Ok(())
    }
}
