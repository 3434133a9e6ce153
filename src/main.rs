use clap::Parser;
use interview_coach::cli::{self, Cli, Command};
use interview_coach::config::AppConfig;
use interview_coach::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_logging(&config.logging);

    match cli.command {
        Command::Serve => cli::serve::run(&config).await,
        Command::Chat(args) => cli::chat::run(&config, args).await,
        Command::Ask(args) => cli::ask::run(&config, args).await,
        Command::Logs(args) => cli::logs::run(&config, args).await,
    }
}
