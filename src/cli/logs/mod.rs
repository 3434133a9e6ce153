//! Logs command - inspect or truncate the classification audit log

use std::io::Write;

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{AuditLog, ClassificationLogEntry};
use crate::infrastructure::audit::JsonlAuditLog;

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Truncate the log instead of printing it
    #[arg(long)]
    pub clear: bool,
}

pub async fn run(config: &AppConfig, args: LogsArgs) -> anyhow::Result<()> {
    let audit_log = JsonlAuditLog::new(config.storage.audit_log_path());

    if args.clear {
        audit_log.clear().await?;
        println!("Cleared {}", audit_log.path().display());
        return Ok(());
    }

    let entries = audit_log.read_all().await?;
    print_entries(&mut std::io::stdout().lock(), &entries)?;

    Ok(())
}

/// One record per line, in the same JSON shape as the log file
fn print_entries(out: &mut impl Write, entries: &[ClassificationLogEntry]) -> anyhow::Result<()> {
    for entry in entries {
        writeln!(out, "{}", serde_json::to_string(entry)?)?;
    }

    Ok(())
}
