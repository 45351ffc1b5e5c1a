use clap::Parser;
use question_forge::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::Serve => cli::serve::run(config).await,
        Command::Models => cli::models::run(config).await,
        Command::Generate(args) => cli::generate::run(config, args).await,
    }
}
