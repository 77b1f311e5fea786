use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// A term/definition pair as returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub term: String,
    pub definition: String,
}

impl Concept {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Identity of a flashcard inside the store that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlashcardId(pub u64);

impl fmt::Display for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    pub fn concept(&self) -> Concept {
        Concept::new(self.term.clone(), self.definition.clone())
    }
}

/// Immutable point-in-time copy of a flashcard collection.
pub type Snapshot = Arc<[Flashcard]>;

/// Where the curated collection should be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    Spreadsheet,
    Document,
}

impl ExportTarget {
    pub fn name(&self) -> &'static str {
        match self {
            ExportTarget::Spreadsheet => "spreadsheet",
            ExportTarget::Document => "document",
        }
    }

    pub fn default_extension(&self) -> &'static str {
        match self {
            ExportTarget::Spreadsheet => "xlsx",
            ExportTarget::Document => "pdf",
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
