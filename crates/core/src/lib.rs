//! Dynamocards Core Library
//!
//! Turns a video reference into study flashcards via a remote analysis
//! service, keeps the curated collection for a session, and exports it as a
//! spreadsheet or a paginated PDF.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod layout;
pub mod paths;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{AnalysisClient, HttpAnalysisClient, parse_concepts};
pub use config::ServiceConfig;
pub use error::{AnalysisError, ConfigError, DynamocardsError, ExportError, FailureKind, Result};
pub use export::{ExportSummary, Exporters, Table, TabularFormat};
pub use format::{format_export_summary, format_flashcards_readable};
pub use layout::{OverflowPolicy, PageGeometry, Placement, paginate};
pub use paths::{get_export_dir, get_export_path};
pub use session::{
    CollectionView, Completion, ExportOutcome, ExportState, SessionController, SessionState,
    SkipReason,
};
pub use store::FlashcardStore;
pub use types::{Concept, ExportTarget, Flashcard, FlashcardId, Snapshot};
