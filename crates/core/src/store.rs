use std::sync::Arc;

use crate::types::{Concept, Flashcard, FlashcardId, Snapshot};

/// Ordered flashcard collection for one session.
///
/// Positions are always dense `0..len`. Every card also gets an id that is
/// never reused by this store, so a discard aimed at an id from an older
/// collection cannot hit a newer card.
#[derive(Debug, Default)]
pub struct FlashcardStore {
    cards: Vec<Flashcard>,
    next_id: u64,
}

impl FlashcardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, concepts: Vec<Concept>) {
        self.cards = concepts
            .into_iter()
            .map(|concept| {
                let id = FlashcardId(self.next_id);
                self.next_id += 1;
                Flashcard {
                    id,
                    term: concept.term,
                    definition: concept.definition,
                }
            })
            .collect();
    }

    /// Remove the card at `position`. Out-of-range positions are ignored.
    pub fn discard(&mut self, position: usize) -> Option<Flashcard> {
        (position < self.cards.len()).then(|| self.cards.remove(position))
    }

    pub fn discard_id(&mut self, id: FlashcardId) -> Option<Flashcard> {
        let position = self.position_of(id)?;
        Some(self.cards.remove(position))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn position_of(&self, id: FlashcardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    pub fn get(&self, position: usize) -> Option<&Flashcard> {
        self.cards.get(position)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::from(self.cards.as_slice())
    }
}
