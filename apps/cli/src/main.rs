use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use dynamocards_core::{
    ExportOutcome, ExportTarget, FlashcardId, HttpAnalysisClient, ServiceConfig,
    SessionController, SessionState, SkipReason, format_export_summary,
    format_flashcards_readable, get_export_dir, get_export_path,
};

mod repl;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for ExportTarget (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliTarget {
    Spreadsheet,
    Document,
}

impl From<CliTarget> for ExportTarget {
    fn from(cli: CliTarget) -> Self {
        match cli {
            CliTarget::Spreadsheet => ExportTarget::Spreadsheet,
            CliTarget::Document => ExportTarget::Document,
        }
    }
}

#[derive(Parser)]
#[command(name = "dynamocards")]
#[command(about = "Turn a YouTube video into flashcards and export them as a spreadsheet or PDF")]
struct Cli {
    /// Video URL
    url: String,

    /// Analysis endpoint. Overrides DYNAMOCARDS_ENDPOINT.
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds, 0 disables it. Overrides DYNAMOCARDS_TIMEOUT_SECS.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Discard the card at this position of the returned list (repeatable)
    #[arg(short, long)]
    discard: Vec<usize>,

    /// Export the curated cards
    #[arg(short = 'x', long)]
    export: Option<CliTarget>,

    /// Output file. Spreadsheets ending in .csv are written as CSV, anything else as XLSX.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Curate and export from an interactive prompt
    #[arg(short, long)]
    interactive: bool,
}

pub(crate) fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run one analysis with a spinner. Returns false if it failed.
pub(crate) async fn analyze(session: &mut SessionController, url: &str) -> bool {
    let started = Instant::now();
    let spinner = create_spinner("Analyzing video...");

    let failure = match session.submit(url).await {
        SessionState::Error(message) => Some(message.clone()),
        _ => None,
    };

    if let Some(message) = failure {
        spinner.finish_and_clear();
        eprintln!("{} {}", style("Error:").red().bold(), message);
        return false;
    }

    spinner.finish_with_message(format!(
        "{} Found {} concepts {}",
        style("✓").green().bold(),
        session.len(),
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    ));
    true
}

/// The explicit `output`, or a file under `default_dir` named after `url`.
///
/// `default_dir` is only created when there are cards to write.
fn output_path(
    session: &SessionController,
    target: ExportTarget,
    url: &str,
    output: Option<&Path>,
    default_dir: &Path,
) -> std::io::Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    if !session.is_empty() {
        std::fs::create_dir_all(default_dir)?;
    }
    Ok(get_export_path(default_dir, url, target))
}

/// Resolve an output path and export to it, printing the result.
pub(crate) fn export(
    session: &mut SessionController,
    url: &str,
    output: Option<&Path>,
) -> Result<()> {
    let Some(target) = session.target() else {
        println!("{} No export target selected", style("!").yellow().bold());
        return Ok(());
    };

    let path = output_path(session, target, url, output, &get_export_dir())?;

    match session.export(&path)? {
        ExportOutcome::Written { path, summary, .. } => {
            println!(
                "{} Exported {}: {}",
                style("✓").green().bold(),
                format_export_summary(&summary),
                style(path.display()).cyan()
            );
        }
        ExportOutcome::Skipped(reason) => {
            let why = match reason {
                SkipReason::NoTarget => "no export target selected",
                SkipReason::EmptyCollection => "there are no flashcards to export",
                SkipReason::Loading => "an analysis is still running",
            };
            println!("{} Nothing exported: {}", style("!").yellow().bold(), why);
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint)?;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout_secs(secs);
    }

    tracing::debug!(endpoint = %config.endpoint, timeout = ?config.timeout, "using analysis service");
    let client = HttpAnalysisClient::new(&config)?;
    let mut session = SessionController::new(Arc::new(client));
    session.select_target(cli.export.map(ExportTarget::from));

    println!(
        "\n{}  {}\n",
        style("dynamocards").cyan().bold(),
        style("Video to Flashcards").dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    if !analyze(&mut session, &cli.url).await {
        std::process::exit(1);
    }

    // positions refer to the list as returned, whatever order they are given in
    let snapshot = session.snapshot();
    let doomed: Vec<FlashcardId> = cli
        .discard
        .iter()
        .filter_map(|&position| snapshot.get(position).map(|card| card.id))
        .collect();
    for position in cli.discard.iter().filter(|&&p| p >= snapshot.len()) {
        println!(
            "{} No card at position {}, ignored",
            style("!").yellow().bold(),
            position
        );
    }
    for id in doomed {
        session.discard_card(id);
    }

    if cli.interactive {
        return repl::run(&mut session, cli.url, cli.output).await;
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_flashcards_readable(&session.snapshot()));

    if session.target().is_some() {
        export(&mut session, &cli.url, cli.output.as_deref())?;
    }

    Ok(())
}
