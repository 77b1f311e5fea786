use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dynamocards_core::{ExportTarget, SessionController, format_flashcards_readable};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  list                          show the current flashcards
  discard <N> [N...]            discard cards by position (as shown by `list`)
  target spreadsheet|document|none
                                choose what `export` writes
  export [PATH]                 export the current flashcards
  search <URL>                  analyze another video, replacing the current cards
  help                          show this help
  quit                          leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Discard(Vec<usize>),
    Target(Option<ExportTarget>),
    Export(Option<PathBuf>),
    Search(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    match verb {
        "list" | "ls" => Ok(Command::List),
        "discard" | "rm" => {
            if rest.is_empty() {
                return Err("discard needs at least one position".to_string());
            }
            rest.iter()
                .map(|w| w.parse::<usize>().map_err(|_| format!("not a position: {w}")))
                .collect::<Result<Vec<_>, _>>()
                .map(Command::Discard)
        }
        "target" => match rest.as_slice() {
            ["spreadsheet" | "sheet" | "xlsx" | "csv"] => {
                Ok(Command::Target(Some(ExportTarget::Spreadsheet)))
            }
            ["document" | "pdf"] => Ok(Command::Target(Some(ExportTarget::Document))),
            ["none"] => Ok(Command::Target(None)),
            _ => Err("usage: target spreadsheet|document|none".to_string()),
        },
        "export" => match rest.as_slice() {
            [] => Ok(Command::Export(None)),
            [path] => Ok(Command::Export(Some(PathBuf::from(path)))),
            _ => Err("usage: export [PATH]".to_string()),
        },
        "search" => match rest.as_slice() {
            [url] => Ok(Command::Search(url.to_string())),
            _ => Err("usage: search <URL>".to_string()),
        },
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

pub async fn run(
    session: &mut SessionController,
    mut url: String,
    default_output: Option<PathBuf>,
) -> Result<()> {
    println!("{}", format_flashcards_readable(&session.snapshot()));
    println!("{}", style("Type `help` for commands.").dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").cyan().bold());
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{} {}", style("!").yellow().bold(), message);
                continue;
            }
        };

        match command {
            Command::List => println!("{}", format_flashcards_readable(&session.snapshot())),
            Command::Discard(positions) => {
                // resolve every position against the list as shown before removing any
                let snapshot = session.snapshot();
                for position in positions {
                    match snapshot.get(position) {
                        Some(card) if session.discard_card(card.id) => {
                            println!("{} Discarded {}", style("✓").green().bold(), card.term)
                        }
                        _ => println!(
                            "{} No card at position {}",
                            style("!").yellow().bold(),
                            position
                        ),
                    }
                }
            }
            Command::Target(target) => {
                session.select_target(target);
                let name = target.map_or("none", |t| t.name());
                println!("{} Export target: {}", style("✓").green().bold(), name);
            }
            Command::Export(path) => {
                let output = path.or_else(|| default_output.clone());
                if let Err(e) = crate::export(session, &url, output.as_deref()) {
                    println!("{} {}", style("Error:").red().bold(), e);
                }
            }
            Command::Search(next) => {
                url = next;
                if crate::analyze(session, &url).await {
                    println!("{}", format_flashcards_readable(&session.snapshot()));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
