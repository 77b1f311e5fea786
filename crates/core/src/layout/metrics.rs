use super::Emphasis;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Measures rendered text width in millimetres.
pub trait TextMeasure {
    fn width_mm(&self, text: &str, emphasis: Emphasis, font_size_pt: f32) -> f32;
}

/// Advance widths of the PDF base-14 Helvetica faces, in 1/1000 em.
///
/// Characters outside printable ASCII fall back to the width of a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

const FALLBACK_ADVANCE: u16 = 556;

// ' ' (0x20) through '~' (0x7e)
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl HelveticaMetrics {
    fn advance(ch: char, emphasis: Emphasis) -> u16 {
        let table = match emphasis {
            Emphasis::Bold => &HELVETICA_BOLD,
            Emphasis::Normal => &HELVETICA,
        };
        match ch {
            ' '..='~' => table[ch as usize - 0x20],
            _ => FALLBACK_ADVANCE,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn width_mm(&self, text: &str, emphasis: Emphasis, font_size_pt: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(Self::advance(ch, emphasis)))
            .sum();
        units as f32 * font_size_pt / 1000.0 / PT_PER_MM
    }
}

/// Every character advances by the same width, regardless of font size or emphasis.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance(pub f32);

impl TextMeasure for FixedAdvance {
    fn width_mm(&self, text: &str, _emphasis: Emphasis, _font_size_pt: f32) -> f32 {
        text.chars().count() as f32 * self.0
    }
}
