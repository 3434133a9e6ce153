//! CLI module for the interview coach
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `chat`: interactive terminal session with a persisted transcript
//! - `ask`: resolve a single question
//! - `logs`: print or clear the classification audit log

pub mod ask;
pub mod chat;
pub mod logs;
pub mod serve;

use clap::{Parser, Subcommand};

/// Interview Coach - career and interview preparation assistant
#[derive(Parser)]
#[command(name = "interview-coach")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Start an interactive coaching session
    Chat(chat::ChatArgs),

    /// Resolve one question and exit
    Ask(ask::AskArgs),

    /// Print or clear the classification audit log
    Logs(logs::LogsArgs),
}
