//! Interactive chat surface.
//!
//! One task multiplexes user input and the periodic status probe with
//! `tokio::select!`. Session state is only ever touched from this task, so
//! the probe and user flows interleave at await points without locks; a
//! long flow (say a bulk load) simply delays the next probe tick.

use std::io::Write as _;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;

use crate::api::ApiClient;
use crate::config::Config;
use crate::render::RenderMode;
use crate::session::ClientSession;

enum Outcome {
    Continue,
    Quit,
}

pub async fn run_chat(config: &Config, mode: RenderMode) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let mut session = ClientSession::new(api, mode.renderer(), config);

    println!("rag chat — talking to {}", session.api_base_url());
    println!("plain text asks a question; :help lists commands; :q quits");
    println!();

    session.refresh_status().await;

    let mut top_k = config.chat.top_k;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(config.api.poll_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Intervals fire immediately; the startup probe above already ran.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.refresh_status().await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match handle_line(&mut session, config, &mut lines, &mut top_k, input).await? {
                    Outcome::Quit => break,
                    Outcome::Continue => {}
                }
            }
        }
    }

    println!("goodbye");
    Ok(())
}

async fn handle_line(
    session: &mut ClientSession,
    config: &Config,
    lines: &mut Lines<BufReader<Stdin>>,
    top_k: &mut u32,
    input: &str,
) -> Result<Outcome> {
    let Some(command) = input.strip_prefix(':') else {
        // Flow errors were already surfaced as notices; the chat goes on.
        let _ = session.ask(input, *top_k).await;
        return Ok(Outcome::Continue);
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "q" | "quit" => return Ok(Outcome::Quit),
        "help" => print_help(config),
        "status" => {
            session.refresh_status().await;
            print_status(session);
        }
        "add" => {
            let _ = session.ingest(rest).await;
        }
        "seed" => {
            let _ = session.load_examples().await;
        }
        "docs" => print_documents(session),
        "topk" => match rest.parse::<u32>() {
            Ok(value) => {
                *top_k = value;
                println!("top_k set to {value} (configured choices: {})", choices(config));
            }
            Err(_) => {
                println!("usage: :topk N  (configured choices: {})", choices(config));
            }
        },
        "clear" => {
            if session.documents().is_empty() {
                // Emits the "nothing to clear" notice.
                session.clear_local();
            } else {
                eprint!(
                    "clear {} locally tracked document(s)? the remote index is unaffected [y/N] ",
                    session.documents().len()
                );
                let _ = std::io::stderr().flush();
                let confirmed = matches!(
                    lines.next_line().await?.as_deref().map(str::trim),
                    Some("y" | "Y" | "yes")
                );
                if confirmed {
                    session.clear_local();
                } else {
                    println!("kept the local list");
                }
            }
        }
        other => println!("unknown command :{other} — :help lists commands"),
    }

    Ok(Outcome::Continue)
}

fn choices(config: &Config) -> String {
    config
        .chat
        .top_k_choices
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_help(config: &Config) {
    println!("commands:");
    println!("  <question>    ask the service (top_k = configurable, :topk)");
    println!("  :add TEXT     ingest TEXT as a new document");
    println!("  :seed         ingest the configured example documents");
    println!("  :docs         list documents ingested in this session");
    println!("  :clear        forget the local document list (remote index unaffected)");
    println!("  :topk N       set top_k for questions (choices: {})", choices(config));
    println!("  :status       probe the service and show stats");
    println!("  :q            quit");
}

fn print_status(session: &ClientSession) {
    let stats = session.stats();
    let gates = session.gates();

    println!(
        "connection   {}",
        if session.connected() { "connected" } else { "disconnected (stats may be stale)" }
    );
    println!("service      {}", session.api_base_url());
    println!("indexed      {} documents", stats.indexed_documents);
    println!("embedding    {}", stats.embedding_model);
    println!("llm          {}", stats.llm_model);
    println!("local        {} documents this session", session.documents().len());
    println!(
        "actions      ingest {}, ask {}",
        if gates.ingest { "ready" } else { "unavailable" },
        if gates.ask { "ready" } else { "unavailable" }
    );
}

fn print_documents(session: &ClientSession) {
    if session.documents().is_empty() {
        println!("no local documents yet — :add some text, or :seed the examples");
        return;
    }
    for (index, text) in session.documents().iter().enumerate() {
        println!("{:>3}. {}", index + 1, text);
    }
}
