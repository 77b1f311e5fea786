use crate::types::Flashcard;

pub const HEADER: [&str; 2] = ["term", "definition"];

/// Row projection of a flashcard collection: a fixed header plus one row per card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<[String; 2]>,
}

impl Table {
    pub fn from_cards(cards: &[Flashcard]) -> Self {
        Self {
            rows: cards
                .iter()
                .map(|card| [card.term.clone(), card.definition.clone()])
                .collect(),
        }
    }

    pub fn header(&self) -> [&'static str; 2] {
        HEADER
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
