use std::{path::PathBuf, sync::Arc};

use dynamocards_core::{
    AnalysisClient, AnalysisError, CollectionView, Concept, ExportOutcome, ExportTarget,
    FlashcardId, HttpAnalysisClient, ServiceConfig, SessionController, SkipReason,
    format_export_summary, get_export_dir, get_export_path,
};
use iced::widget::{Column, button, column, radio, row, scrollable, text, text_input};
use iced::{Element, Length, Task};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = match ServiceConfig::from_env()
        .map_err(|e| e.to_string())
        .and_then(|config| HttpAnalysisClient::new(&config).map_err(|e| e.to_string()))
    {
        Ok(client) => Arc::new(client) as Arc<dyn AnalysisClient>,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    iced::application(move || App::new(Arc::clone(&client)), App::update, App::view)
        .title("Dynamocards")
        .run()
}

struct App {
    session: SessionController,
    url: String,
    output: String,
    status: Option<String>,
}

#[derive(Debug, Clone)]
enum Message {
    UrlChanged(String),
    OutputChanged(String),
    Submit,
    Analyzed(u64, Result<Vec<Concept>, AnalysisError>),
    Discard(FlashcardId),
    TargetSelected(ExportTarget),
    Export,
}

impl App {
    fn new(client: Arc<dyn AnalysisClient>) -> (Self, Task<Message>) {
        (
            Self {
                session: SessionController::new(client),
                url: String::new(),
                output: String::new(),
                status: None,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UrlChanged(url) => self.url = url,
            Message::OutputChanged(output) => self.output = output,
            Message::Submit => {
                self.status = None;
                let pending = self.session.begin_submit(&self.url);
                let generation = pending.generation;
                let client = self.session.client();

                return Task::perform(
                    async move { client.analyze(&pending.reference).await },
                    move |result| Message::Analyzed(generation, result),
                );
            }
            Message::Analyzed(generation, result) => {
                self.session.complete(generation, result);
            }
            Message::Discard(id) => {
                self.session.discard_card(id);
            }
            Message::TargetSelected(target) => self.session.select_target(Some(target)),
            Message::Export => self.status = Some(self.export()),
        }
        Task::none()
    }

    fn output_path(&self, target: ExportTarget) -> std::io::Result<PathBuf> {
        if !self.output.trim().is_empty() {
            return Ok(PathBuf::from(self.output.trim()));
        }
        let dir = get_export_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(get_export_path(&dir, &self.url, target))
    }

    fn export(&mut self) -> String {
        let Some(target) = self.session.target() else {
            return "Choose an export format first.".to_string();
        };
        let path = match self.output_path(target) {
            Ok(path) => path,
            Err(e) => return format!("Export failed: {e}"),
        };

        match self.session.export(&path) {
            Ok(ExportOutcome::Written { path, summary, .. }) => {
                format!("Saved {} to {}", format_export_summary(&summary), path.display())
            }
            Ok(ExportOutcome::Skipped(SkipReason::EmptyCollection)) => {
                "There are no flashcards to export.".to_string()
            }
            Ok(ExportOutcome::Skipped(SkipReason::Loading)) => {
                "Wait for the analysis to finish.".to_string()
            }
            Ok(ExportOutcome::Skipped(SkipReason::NoTarget)) => {
                "Choose an export format first.".to_string()
            }
            Err(e) => format!("Export failed: {e}"),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let search = row![
            text_input("Paste Youtube Link Here", &self.url)
                .on_input(Message::UrlChanged)
                .on_submit(Message::Submit),
            button("Generate Flashcards").on_press(Message::Submit),
        ]
        .spacing(10);

        let target = self.session.target();
        let can_export = target.is_some() && !self.session.is_empty();
        let export = row![
            radio("Spreadsheet", ExportTarget::Spreadsheet, target, Message::TargetSelected),
            radio("PDF document", ExportTarget::Document, target, Message::TargetSelected),
            text_input("Output file (optional)", &self.output).on_input(Message::OutputChanged),
            button("Export").on_press_maybe(can_export.then_some(Message::Export)),
        ]
        .spacing(20);

        let cards: Element<'_, Message> = match self.session.view() {
            CollectionView::Idle => text("Paste a link to generate flashcards.").into(),
            CollectionView::Loading => text("Searching....").into(),
            CollectionView::Error(message) => text(message).style(text::danger).into(),
            CollectionView::NoConcepts => text("No concepts found.").into(),
            CollectionView::Cards(cards) => {
                let list = Column::with_children(cards.iter().map(|card| {
                    let card_view: Element<'_, Message> = column![
                        text(card.term.clone()).size(18),
                        text(card.definition.clone()),
                        button("Discard").on_press(Message::Discard(card.id)),
                    ]
                    .spacing(6)
                    .into();
                    card_view
                }))
                .spacing(16);
                scrollable(list).height(Length::Fill).into()
            }
        };

        let mut content = column![
            text("Youtube Link to Flashcards Generator").size(24),
            search,
            export,
        ]
        .padding(20)
        .spacing(12);

        if let Some(status) = &self.status {
            content = content.push(text(status.clone()));
        }

        content.push(cards).into()
    }
}
