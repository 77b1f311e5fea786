use crate::{
    export::{ExportSummary, TabularFormat},
    types::Flashcard,
};

/// Format a collection as a numbered, human-readable list
pub fn format_flashcards_readable(cards: &[Flashcard]) -> String {
    if cards.is_empty() {
        return "No concepts found.\n".to_string();
    }

    let mut output = String::new();
    for (position, card) in cards.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", position, card.term));
        for line in card.definition.lines() {
            output.push_str(&format!("     {}\n", line.trim()));
        }
        output.push('\n');
    }
    output
}

pub fn format_export_summary(summary: &ExportSummary) -> String {
    match summary {
        ExportSummary::Spreadsheet { format, rows } => {
            let format = match format {
                TabularFormat::Xlsx => "XLSX",
                TabularFormat::Csv => "CSV",
            };
            format!("{format} spreadsheet, {rows} {}", plural(*rows, "row", "rows"))
        }
        ExportSummary::Document { pages, .. } => {
            format!("PDF document, {pages} {}", plural(*pages, "page", "pages"))
        }
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
