//! Chat command - interactive coaching session
//!
//! The transcript is loaded on start and rewritten after every successful
//! turn. A failed turn leaves it untouched.

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{ChatTurn, DomainError, TranscriptRepository};
use crate::infrastructure::services::{Resolution, ResponseResolver};

const PROMPT: &str = "you> ";

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Do not print how the query was classified
    #[arg(long)]
    pub hide_source: bool,
}

/// One conversation bound to its persisted transcript
#[derive(Debug)]
pub struct ChatSession {
    resolver: ResponseResolver,
    transcript: Arc<dyn TranscriptRepository>,
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    pub async fn open(
        resolver: ResponseResolver,
        transcript: Arc<dyn TranscriptRepository>,
    ) -> Result<Self, DomainError> {
        let turns = transcript.load_or_initial().await?;

        Ok(Self {
            resolver,
            transcript,
            turns,
        })
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Resolve `query` against the conversation so far and persist the exchange
    pub async fn send(&mut self, query: &str) -> Result<Resolution, DomainError> {
        let resolution = self.resolver.resolve(query, &self.turns).await?;

        let mut turns = self.turns.clone();
        turns.push(ChatTurn::human(query));
        turns.push(ChatTurn::ai(resolution.text.clone()));
        self.transcript.save(&turns).await?;
        self.turns = turns;

        Ok(resolution)
    }
}

pub async fn run(config: &AppConfig, args: ChatArgs) -> anyhow::Result<()> {
    let (repositories, resolver) = crate::create_runtime(config)?;
    let mut session = ChatSession::open(resolver, repositories.transcript).await?;

    info!(turns = session.turns().len(), "Chat session started");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all("🎯 Ask me anything about tech interviews! Type `exit` to quit.\n".as_bytes())
        .await?;

    repl(&mut session, stdin, &mut stdout, !args.hide_source).await
}

/// Read queries line by line until EOF or `exit`/`quit`
///
/// Resolution errors are reported and the loop continues; I/O errors end it.
async fn repl<R, W>(
    session: &mut ChatSession,
    input: R,
    output: &mut W,
    show_source: bool,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.send(query).await {
            Ok(resolution) => {
                let mut reply = format!("\ncoach> {}\n", resolution.text);
                if show_source {
                    reply.push_str(&format!("🧠 Context detected via: {}\n", resolution.provenance()));
                }
                reply.push('\n');
                output.write_all(reply.as_bytes()).await?;
            }
            Err(e) => {
                warn!(error = %e, "Turn failed");
                output.write_all(format!("\n⚠️  {}\n\n", e).as_bytes()).await?;
            }
        }
    }

    output.flush().await?;
    Ok(())
}
