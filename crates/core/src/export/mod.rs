//! Export of a flashcard snapshot to a spreadsheet or a paginated document.

pub mod csv_table;
pub mod pdf;
pub mod table;
pub mod xlsx;

use std::path::Path;

pub use csv_table::CsvTableWriter;
pub use pdf::PdfDocumentWriter;
pub use table::{HEADER, Table};
pub use xlsx::XlsxTableWriter;

use crate::{
    error::ExportError,
    layout::{HelveticaMetrics, PageGeometry, Placement, page_count, paginate},
    types::{ExportTarget, Flashcard},
};

/// Encodes a [`Table`] to a file.
pub trait TableWriter: Send + Sync {
    fn write(&self, table: &Table, path: &Path) -> Result<(), ExportError>;
}

/// Encodes laid-out placements to a file.
pub trait DocumentWriter: Send + Sync {
    fn write(
        &self,
        placements: &[Placement],
        geometry: &PageGeometry,
        path: &Path,
    ) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Xlsx,
    Csv,
}

impl TabularFormat {
    /// CSV for a `.csv` extension, XLSX for anything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TabularFormat::Csv,
            _ => TabularFormat::Xlsx,
        }
    }
}

/// What a finished export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSummary {
    Spreadsheet { format: TabularFormat, rows: usize },
    Document { pages: usize, blocks: usize },
}

/// The writers used for each target.
pub struct Exporters {
    pub geometry: PageGeometry,
    pub document: Box<dyn DocumentWriter>,
    pub xlsx: Box<dyn TableWriter>,
    pub csv: Box<dyn TableWriter>,
}

impl Default for Exporters {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            document: Box::new(PdfDocumentWriter::default()),
            xlsx: Box::new(XlsxTableWriter),
            csv: Box::new(CsvTableWriter),
        }
    }
}

impl Exporters {
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn export(
        &self,
        target: ExportTarget,
        cards: &[Flashcard],
        path: &Path,
    ) -> Result<ExportSummary, ExportError> {
        match target {
            ExportTarget::Spreadsheet => {
                let table = Table::from_cards(cards);
                let format = TabularFormat::from_path(path);
                let writer = match format {
                    TabularFormat::Xlsx => &self.xlsx,
                    TabularFormat::Csv => &self.csv,
                };
                writer.write(&table, path)?;
                Ok(ExportSummary::Spreadsheet {
                    format,
                    rows: table.len(),
                })
            }
            ExportTarget::Document => {
                let placements = paginate(cards, &self.geometry, &HelveticaMetrics);
                self.document.write(&placements, &self.geometry, path)?;
                Ok(ExportSummary::Document {
                    pages: page_count(&placements),
                    blocks: placements.len(),
                })
            }
        }
    }
}
