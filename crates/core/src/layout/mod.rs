//! Page layout for the document export.
//!
//! [`paginate`] decides which text goes on which page and at what offset. It
//! knows nothing about PDF encoding; the writer in `export::pdf` replays the
//! placements it produces.

pub mod metrics;
pub mod wrap;

pub use metrics::{FixedAdvance, HelveticaMetrics, TextMeasure};
pub use wrap::wrap_text;

use crate::types::Flashcard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Bold,
    Normal,
}

/// When to move a flashcard to a fresh page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Break only if the term block and the term/definition gap do not fit.
    /// A long definition may run past the bottom limit.
    #[default]
    TermOnly,
    /// Break if the term and definition blocks together do not fit.
    WholeCard,
}

/// Page dimensions and spacing, all lengths in millimetres measured from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Lowest offset a block may reach before a break is required.
    pub bottom_limit: f32,
    pub text_width: f32,
    pub term_x: f32,
    pub definition_x: f32,
    pub font_size_pt: f32,
    pub line_height: f32,
    pub gap_term_definition: f32,
    pub gap_between_concepts: f32,
    pub first_page_top: f32,
    pub continuation_top: f32,
    pub overflow: OverflowPolicy,
}

impl PageGeometry {
    /// A4 portrait with 12pt text.
    pub fn a4() -> Self {
        let page_height = 297.0;
        let gap_between_concepts = 2.0;
        Self {
            page_width: 210.0,
            page_height,
            bottom_limit: page_height - gap_between_concepts,
            text_width: 180.0,
            term_x: 10.0,
            definition_x: 15.0,
            font_size_pt: 12.0,
            line_height: 8.0,
            gap_term_definition: 1.0,
            gap_between_concepts,
            first_page_top: 10.0,
            continuation_top: 5.0,
            overflow: OverflowPolicy::TermOnly,
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// One block of text at a fixed position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub lines: Vec<String>,
    pub emphasis: Emphasis,
}

impl Placement {
    pub fn height(&self, line_height: f32) -> f32 {
        self.lines.len() as f32 * line_height
    }
}

/// Lay out `cards` in order into pages of `geometry`.
///
/// Page indices start at 0 and grow by at most one per card. A card is never
/// moved to a new page when nothing has been placed on the current one yet.
pub fn paginate(
    cards: &[Flashcard],
    geometry: &PageGeometry,
    measure: &impl TextMeasure,
) -> Vec<Placement> {
    let g = geometry;
    let mut placements = Vec::with_capacity(cards.len() * 2);
    let mut page_index = 0;
    let mut y = g.first_page_top;
    let mut page_has_content = false;

    for card in cards {
        let term_lines = wrap_text(&card.term, g.text_width, Emphasis::Bold, g.font_size_pt, measure);
        let definition_lines = wrap_text(
            &card.definition,
            g.text_width,
            Emphasis::Normal,
            g.font_size_pt,
            measure,
        );

        let term_height = term_lines.len() as f32 * g.line_height;
        let definition_height = definition_lines.len() as f32 * g.line_height;
        let term_extent = term_height + g.gap_term_definition;
        let card_extent = term_extent + definition_height;
        let required = match g.overflow {
            OverflowPolicy::WholeCard if g.continuation_top + card_extent <= g.bottom_limit => {
                card_extent
            }
            // A card taller than a fresh page is broken like TermOnly.
            _ => term_extent,
        };

        if page_has_content && y + required > g.bottom_limit {
            page_index += 1;
            y = g.continuation_top;
            tracing::trace!(page_index, term = %card.term, "page break");
        }

        placements.push(Placement {
            page_index,
            x: g.term_x,
            y,
            lines: term_lines,
            emphasis: Emphasis::Bold,
        });
        y += term_height + g.gap_term_definition;

        placements.push(Placement {
            page_index,
            x: g.definition_x,
            y,
            lines: definition_lines,
            emphasis: Emphasis::Normal,
        });
        y += definition_height + g.gap_between_concepts;
        page_has_content = true;
    }

    placements
}

/// Number of pages a placement list occupies; an empty list still renders one blank page.
pub fn page_count(placements: &[Placement]) -> usize {
    placements.last().map_or(1, |p| p.page_index + 1)
}
