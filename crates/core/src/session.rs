//! Session orchestration: analysis requests, curation, and export.
//!
//! Two independent state machines live here. [`SessionState`] follows the
//! analysis request (`Idle -> Loading -> Ready | Error`), and [`ExportState`]
//! follows an export (`Idle -> Exporting -> Idle`). An [`ExportJob`] can only
//! be built from a non-empty snapshot, so an export of nothing never enters
//! `Exporting`.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    client::AnalysisClient,
    error::{AnalysisError, ExportError},
    export::{ExportSummary, Exporters},
    store::FlashcardStore,
    types::{Concept, ExportTarget, FlashcardId, Snapshot},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading { generation: u64, reference: String },
    Error(String),
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Exporting(ExportJob),
}

/// A pending export: a target plus the non-empty snapshot it will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    target: ExportTarget,
    snapshot: Snapshot,
}

impl ExportJob {
    pub fn new(target: ExportTarget, snapshot: Snapshot) -> Option<Self> {
        (!snapshot.is_empty()).then_some(Self { target, snapshot })
    }

    pub fn target(&self) -> ExportTarget {
        self.target
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Handle for an analysis request started with [`SessionController::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub generation: u64,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was started after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoTarget,
    EmptyCollection,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written {
        target: ExportTarget,
        path: PathBuf,
        summary: ExportSummary,
    },
    Skipped(SkipReason),
}

/// What a front end should display for the collection area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionView {
    Idle,
    Loading,
    Error(String),
    NoConcepts,
    Cards(Snapshot),
}

pub struct SessionController {
    client: Arc<dyn AnalysisClient>,
    exporters: Exporters,
    store: FlashcardStore,
    state: SessionState,
    export_state: ExportState,
    target: Option<ExportTarget>,
    generation: u64,
}

impl SessionController {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self::with_exporters(client, Exporters::default())
    }

    pub fn with_exporters(client: Arc<dyn AnalysisClient>, exporters: Exporters) -> Self {
        Self {
            client,
            exporters,
            store: FlashcardStore::new(),
            state: SessionState::Idle,
            export_state: ExportState::Idle,
            target: None,
            generation: 0,
        }
    }

    pub fn client(&self) -> Arc<dyn AnalysisClient> {
        Arc::clone(&self.client)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn export_state(&self) -> &ExportState {
        &self.export_state
    }

    pub fn target(&self) -> Option<ExportTarget> {
        self.target
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn view(&self) -> CollectionView {
        match &self.state {
            SessionState::Idle => CollectionView::Idle,
            SessionState::Loading { .. } => CollectionView::Loading,
            SessionState::Error(message) => CollectionView::Error(message.clone()),
            SessionState::Ready if self.store.is_empty() => CollectionView::NoConcepts,
            SessionState::Ready => CollectionView::Cards(self.store.snapshot()),
        }
    }

    /// Start a new analysis request. The collection and any error are cleared
    /// immediately, and results of earlier requests will be ignored.
    pub fn begin_submit(&mut self, reference: &str) -> PendingAnalysis {
        self.generation += 1;
        self.store.clear();
        self.state = SessionState::Loading {
            generation: self.generation,
            reference: reference.to_string(),
        };
        tracing::info!(generation = self.generation, reference, "analysis started");

        PendingAnalysis {
            generation: self.generation,
            reference: reference.to_string(),
        }
    }

    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<Concept>, AnalysisError>,
    ) -> Completion {
        let outstanding = matches!(
            self.state,
            SessionState::Loading { generation: current, .. } if current == generation
        );
        if !outstanding {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping result of superseded analysis"
            );
            return Completion::Stale;
        }

        match result {
            Ok(concepts) => {
                tracing::info!(generation, count = concepts.len(), "analysis completed");
                self.store.replace_all(concepts);
                self.state = SessionState::Ready;
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "analysis failed");
                self.store.clear();
                self.state = SessionState::Error(err.user_message());
            }
        }
        Completion::Applied
    }

    /// Run a whole request: begin, await the client, complete.
    pub async fn submit(&mut self, reference: &str) -> &SessionState {
        let pending = self.begin_submit(reference);
        let result = self.client.analyze(&pending.reference).await;
        self.complete(pending.generation, result);
        &self.state
    }

    /// Discard by position. Ignored unless the session is ready and the position exists.
    pub fn discard(&mut self, position: usize) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        self.store.discard(position).is_some()
    }

    pub fn discard_card(&mut self, id: FlashcardId) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        self.store.discard_id(id).is_some()
    }

    pub fn select_target(&mut self, target: Option<ExportTarget>) {
        self.target = target;
    }

    /// Export the current collection to the selected target.
    ///
    /// Exporting with no target, while loading, or with an empty collection is
    /// not an error; it is reported as [`ExportOutcome::Skipped`].
    pub fn export(&mut self, path: &Path) -> Result<ExportOutcome, ExportError> {
        let Some(target) = self.target else {
            return Ok(ExportOutcome::Skipped(SkipReason::NoTarget));
        };
        if matches!(self.state, SessionState::Loading { .. }) {
            return Ok(ExportOutcome::Skipped(SkipReason::Loading));
        }
        let Some(job) = ExportJob::new(target, self.store.snapshot()) else {
            return Ok(ExportOutcome::Skipped(SkipReason::EmptyCollection));
        };

        self.export_state = ExportState::Exporting(job.clone());
        let result = self.exporters.export(job.target(), job.snapshot(), path);
        self.export_state = ExportState::Idle;

        let summary = result?;
        tracing::info!(export_target = %target, path = %path.display(), "export written");
        Ok(ExportOutcome::Written {
            target,
            path: path.to_path_buf(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::export::TabularFormat;
    use crate::layout::{OverflowPolicy, PageGeometry};

    /// Replays scripted results and records the references it was asked about.
    #[derive(Default)]
    struct ScriptedClient {
        results: Mutex<Vec<Result<Vec<Concept>, AnalysisError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(results: Vec<Result<Vec<Concept>, AnalysisError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into_iter().rev().collect()),
                seen: Mutex::default(),
            })
        }
    }

    #[async_trait]
    impl AnalysisClient for ScriptedClient {
        async fn analyze(&self, video_reference: &str) -> Result<Vec<Concept>, AnalysisError> {
            self.seen.lock().unwrap().push(video_reference.to_string());
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn concepts(terms: &[&str]) -> Vec<Concept> {
        terms
            .iter()
            .map(|t| Concept::new(*t, format!("about {t}")))
            .collect()
    }

    fn terms(session: &SessionController) -> Vec<String> {
        session.snapshot().iter().map(|c| c.term.clone()).collect()
    }

    #[tokio::test]
    async fn successful_submit_populates_store() {
        let client = ScriptedClient::new(vec![Ok(concepts(&["a", "b", "c"]))]);
        let mut session = SessionController::new(client.clone());

        let state = session.submit("https://youtu.be/xyz").await;
        assert_eq!(state, &SessionState::Ready);
        assert_eq!(terms(&session), vec!["a", "b", "c"]);
        assert_eq!(*client.seen.lock().unwrap(), vec!["https://youtu.be/xyz"]);
    }

    #[tokio::test]
    async fn failures_clear_collection_with_distinct_messages() {
        let client = ScriptedClient::new(vec![
            Ok(concepts(&["kept?"])),
            Err(AnalysisError::Transport {
                reason: "connection refused".into(),
            }),
            Err(AnalysisError::MalformedResponse {
                reason: "missing field `key_concepts`".into(),
            }),
        ]);
        let mut session = SessionController::new(client);

        session.submit("one").await;
        assert_eq!(session.len(), 1);

        let transport = match session.submit("two").await {
            SessionState::Error(message) => message.clone(),
            other => panic!("expected error, got {other:?}"),
        };
        assert!(session.is_empty());

        let malformed = match session.submit("three").await {
            SessionState::Error(message) => message.clone(),
            other => panic!("expected error, got {other:?}"),
        };
        assert_ne!(transport, malformed);
        assert_eq!(session.view(), CollectionView::Error(malformed));
    }

    #[tokio::test]
    async fn blank_reference_is_still_sent() {
        let client = ScriptedClient::new(vec![Err(AnalysisError::Status {
            status: 422,
            body: "invalid url".into(),
        })]);
        let mut session = SessionController::new(client.clone());

        let state = session.submit("").await.clone();
        assert!(matches!(state, SessionState::Error(_)));
        assert_eq!(*client.seen.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn begin_submit_clears_previous_results() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let first = session.begin_submit("one");
        session.complete(first.generation, Ok(concepts(&["a"])));
        assert_eq!(session.len(), 1);

        let second = session.begin_submit("two");
        assert!(session.is_empty());
        assert_eq!(session.view(), CollectionView::Loading);
        assert_eq!(
            session.state(),
            &SessionState::Loading {
                generation: second.generation,
                reference: "two".into()
            }
        );
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let slow = session.begin_submit("slow");
        let fast = session.begin_submit("fast");

        assert_eq!(
            session.complete(fast.generation, Ok(concepts(&["fresh"]))),
            Completion::Applied
        );
        assert_eq!(
            session.complete(slow.generation, Ok(concepts(&["old", "older"]))),
            Completion::Stale
        );
        assert_eq!(terms(&session), vec!["fresh"]);
        assert_eq!(session.state(), &SessionState::Ready);
    }

    #[test]
    fn stale_failure_does_not_override_ready() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let slow = session.begin_submit("slow");
        let fast = session.begin_submit("fast");
        session.complete(fast.generation, Ok(concepts(&["fresh"])));

        let late = session.complete(
            slow.generation,
            Err(AnalysisError::Transport {
                reason: "timed out".into(),
            }),
        );
        assert_eq!(late, Completion::Stale);
        assert_eq!(session.state(), &SessionState::Ready);
    }

    #[test]
    fn completing_twice_only_applies_once() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let pending = session.begin_submit("once");
        session.complete(pending.generation, Ok(concepts(&["a"])));
        assert_eq!(
            session.complete(pending.generation, Ok(concepts(&["b"]))),
            Completion::Stale
        );
        assert_eq!(terms(&session), vec!["a"]);
    }

    #[test]
    fn discard_only_applies_when_ready() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        assert!(!session.discard(0));

        let pending = session.begin_submit("v");
        assert!(!session.discard(0));
        session.complete(pending.generation, Ok(concepts(&["a", "b"])));

        assert!(session.discard(0));
        assert!(!session.discard(5));
        assert_eq!(terms(&session), vec!["b"]);

        let id = session.snapshot()[0].id;
        assert!(session.discard_card(id));
        assert!(!session.discard_card(id));
        assert_eq!(session.state(), &SessionState::Ready);
        assert_eq!(session.view(), CollectionView::NoConcepts);
    }

    #[test]
    fn empty_result_is_no_concepts_not_loading() {
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let pending = session.begin_submit("v");
        session.complete(pending.generation, Ok(Vec::new()));
        assert_eq!(session.view(), CollectionView::NoConcepts);
    }

    #[test]
    fn export_is_skipped_without_target_or_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.csv");
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));

        assert_eq!(
            session.export(&path).unwrap(),
            ExportOutcome::Skipped(SkipReason::NoTarget)
        );

        session.select_target(Some(ExportTarget::Spreadsheet));
        assert_eq!(
            session.export(&path).unwrap(),
            ExportOutcome::Skipped(SkipReason::EmptyCollection)
        );

        let pending = session.begin_submit("v");
        assert_eq!(
            session.export(&path).unwrap(),
            ExportOutcome::Skipped(SkipReason::Loading)
        );
        session.complete(pending.generation, Ok(concepts(&["a"])));

        session.select_target(None);
        assert_eq!(
            session.export(&path).unwrap(),
            ExportOutcome::Skipped(SkipReason::NoTarget)
        );
        assert!(!path.exists());
        assert_eq!(session.export_state(), &ExportState::Idle);
    }

    #[test]
    fn export_returns_to_idle_after_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.csv");
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let pending = session.begin_submit("v");
        session.complete(pending.generation, Ok(concepts(&["a", "b"])));
        session.select_target(Some(ExportTarget::Spreadsheet));

        let outcome = session.export(&path).unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Written {
                target: ExportTarget::Spreadsheet,
                path: path.clone(),
                summary: ExportSummary::Spreadsheet {
                    format: TabularFormat::Csv,
                    rows: 2
                },
            }
        );
        assert_eq!(session.export_state(), &ExportState::Idle);
    }

    #[test]
    fn export_returns_to_idle_after_writer_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("cards.pdf");
        let mut session = SessionController::new(ScriptedClient::new(Vec::new()));
        let pending = session.begin_submit("v");
        session.complete(pending.generation, Ok(concepts(&["a"])));
        session.select_target(Some(ExportTarget::Document));

        assert!(session.export(&path).is_err());
        assert_eq!(session.export_state(), &ExportState::Idle);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn document_export_uses_configured_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.pdf");
        let short_page = PageGeometry {
            bottom_limit: 40.0,
            ..PageGeometry::a4()
        };
        let exporters = Exporters::default()
            .with_geometry(short_page.with_overflow(OverflowPolicy::WholeCard));
        let mut session =
            SessionController::with_exporters(ScriptedClient::new(Vec::new()), exporters);
        let pending = session.begin_submit("v");
        session.complete(pending.generation, Ok(concepts(&["a", "b"])));
        session.select_target(Some(ExportTarget::Document));

        // The second card starts at 29; term and definition need 17 more, past 40.
        match session.export(&path).unwrap() {
            ExportOutcome::Written { summary, .. } => {
                assert_eq!(summary, ExportSummary::Document { pages: 2, blocks: 4 })
            }
            other => panic!("expected written export, got {other:?}"),
        }

        let mut term_only = SessionController::with_exporters(
            ScriptedClient::new(Vec::new()),
            Exporters::default().with_geometry(short_page),
        );
        let pending = term_only.begin_submit("v");
        term_only.complete(pending.generation, Ok(concepts(&["a", "b"])));
        term_only.select_target(Some(ExportTarget::Document));
        match term_only.export(&dir.path().join("term_only.pdf")).unwrap() {
            ExportOutcome::Written { summary, .. } => {
                assert_eq!(summary, ExportSummary::Document { pages: 1, blocks: 4 })
            }
            other => panic!("expected written export, got {other:?}"),
        }
    }

    #[test]
    fn export_job_requires_cards() {
        let empty: Snapshot = Arc::from(Vec::new());
        assert!(ExportJob::new(ExportTarget::Document, empty).is_none());
    }
}
