use std::{fs::File, io::BufWriter, path::Path};

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{
    error::ExportError,
    export::DocumentWriter,
    layout::{Emphasis, PageGeometry, Placement},
};

const LAYER_NAME: &str = "Layer 1";

/// Renders placements with the built-in Helvetica faces.
#[derive(Debug, Clone)]
pub struct PdfDocumentWriter {
    pub title: String,
}

impl Default for PdfDocumentWriter {
    fn default() -> Self {
        Self {
            title: "Flashcards".to_string(),
        }
    }
}

fn pdf_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf {
        reason: err.to_string(),
    }
}

impl DocumentWriter for PdfDocumentWriter {
    fn write(
        &self,
        placements: &[Placement],
        geometry: &PageGeometry,
        path: &Path,
    ) -> Result<(), ExportError> {
        let width = Mm(geometry.page_width);
        let height = Mm(geometry.page_height);
        let (doc, first_page, first_layer) = PdfDocument::new(&self.title, width, height, LAYER_NAME);

        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

        let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];

        for placement in placements {
            while layers.len() <= placement.page_index {
                let (page, layer) = doc.add_page(width, height, LAYER_NAME);
                layers.push(doc.get_page(page).get_layer(layer));
            }

            let layer = &layers[placement.page_index];
            let font = match placement.emphasis {
                Emphasis::Bold => &bold,
                Emphasis::Normal => &regular,
            };

            // layout offsets grow downwards; PDF user space grows upwards
            for (i, line) in placement.lines.iter().enumerate() {
                let y = placement.y + i as f32 * geometry.line_height;
                layer.use_text(
                    line.as_str(),
                    geometry.font_size_pt,
                    Mm(placement.x),
                    Mm(geometry.page_height - y),
                    font,
                );
            }
        }

        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_err)?;
        Ok(())
    }
}
