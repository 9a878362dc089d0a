//! Chat command - Interactive session with the simulated agents.

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};

use pilot_chat::{
    ChatSession, IgnoreReason, Message, MessageKind, SessionEvent, SubmitOutcome, UploadedFile,
};
use pilot_router::IntentRouter;

use crate::config::PilotConfig;

#[derive(Args)]
pub struct ChatArgs {
    /// Start with the greeting transcript
    #[arg(long)]
    seed: bool,

    /// Print session events as JSON lines
    #[arg(long)]
    json: bool,
}

const HELP: &str = "Commands: /upload <path>, /transcript, /help, /quit";

pub async fn execute(args: ChatArgs, config: &PilotConfig, quiet: bool) -> Result<()> {
    let router = IntentRouter::from_config(&config.router)?;
    let session = ChatSession::builder()
        .config(config.chat.clone())
        .router(router)
        .seed_transcript(args.seed)
        .build();
    let mut events = session.subscribe();

    if !quiet {
        println!("💬 DataPilot chat (session {})", session.id());
        println!("   {}", HELP);
        println!();
    }
    for message in session.transcript() {
        print_message(&message, args.json)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&session, line.trim(), quiet).await {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, args.json)?,
                Err(broadcast::error::RecvError::Lagged(n)) => warn!("Skipped {} events", n),
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    // Let replies already scheduled land before closing
    while session.pending_reply() {
        match events.recv().await {
            Ok(event) => print_event(&event, args.json)?,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    while let Ok(event) = events.try_recv() {
        print_event(&event, args.json)?;
    }

    session.close();
    info!("Chat session {} ended with {} messages", session.id(), session.message_count());
    Ok(())
}

/// Handle one input line. Returns false when the session should end.
async fn handle_line(session: &ChatSession, line: &str, quiet: bool) -> bool {
    match line.split_once(' ').unwrap_or((line, "")) {
        ("/quit", _) | ("/exit", _) => return false,
        ("/help", _) => println!("   {}", HELP),
        ("/transcript", _) => {
            println!("   {} messages", session.message_count());
            for (name, handle) in session.upload_index() {
                println!("   📎 {} → {}", name, handle);
            }
        }
        ("/upload", path) => {
            let path = path.trim();
            let file = if path.is_empty() {
                None
            } else {
                match UploadedFile::from_path(path).await {
                    Ok(file) => Some(file),
                    Err(e) => {
                        eprintln!("   ⚠️  Could not read {}: {}", path, e);
                        return true;
                    }
                }
            };
            report(session.submit_file(file), quiet);
        }
        _ => report(session.submit_text(line), quiet),
    }
    true
}

fn report(outcome: SubmitOutcome, quiet: bool) {
    if quiet {
        return;
    }
    match outcome {
        SubmitOutcome::Ignored(IgnoreReason::ReplyPending) => {
            println!("   ⏳ Waiting for the current reply, try again shortly")
        }
        SubmitOutcome::Ignored(IgnoreReason::MissingFile) => {
            println!("   Usage: /upload <path>")
        }
        SubmitOutcome::Ignored(IgnoreReason::SessionClosed) => println!("   Session is closed"),
        SubmitOutcome::Ignored(IgnoreReason::NoRuntime) => {
            println!("   Replies cannot be scheduled outside the async runtime")
        }
        SubmitOutcome::TextAccepted { superseded, .. } if superseded > 0 => {
            println!("   ↪ Replaced {} pending repl{}", superseded, if superseded == 1 { "y" } else { "ies" })
        }
        _ => {}
    }
}

fn print_event(event: &SessionEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    if let SessionEvent::MessageAppended { message } = event {
        print_message(message, false)?;
    }
    Ok(())
}

fn print_message(message: &Message, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(message)?);
        return Ok(());
    }

    let time = message.timestamp.format("%H:%M:%S");
    let who = message.sender.display_name();
    match &message.kind {
        MessageKind::Text => println!("[{}] {}: {}", time, who, message.content),
        MessageKind::Log => println!("[{}] ⚙  {}", time, message.content),
        MessageKind::Chart(chart) => {
            println!("[{}] {}: {}", time, who, message.content);
            println!("   📊 {}", chart.title);
            for value in &chart.values {
                println!("   {:>3}% {}", value, "█".repeat(usize::from(*value) / 5));
            }
        }
        MessageKind::File(file) => {
            println!("[{}] {}: 📎 {} ({})", time, who, file.file_name, file.file_ref);
            for line in &file.preview_lines {
                println!("   │ {}", line);
            }
        }
    }
    Ok(())
}
