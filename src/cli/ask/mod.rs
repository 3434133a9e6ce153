//! Ask command - resolve one question and print the answer

use clap::Args;

use crate::api::types::ResolveResponse;
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to resolve
    pub query: String,

    /// Print the full resolution as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve `args.query` without conversation history
pub async fn run(config: &AppConfig, args: AskArgs) -> anyhow::Result<()> {
    let (_, resolver) = crate::create_runtime(config)?;
    let resolution = resolver.resolve(&args.query, &[]).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ResolveResponse::from(resolution))?
        );
    } else {
        println!("{}", resolution.text);
        println!();
        println!("🧠 Context detected via: {}", resolution.provenance());
    }

    Ok(())
}
