use crate::lookup::{run_check, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use permesso::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Permesso Tracker",
    about = "Telegram bot that checks Italian residence-permit status on the Polizia di Stato portal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the Telegram bot and the operational HTTP server (default command)
    Serve(ServeArgs),
    /// Look up a single permit code from the terminal
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the operational HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the operational HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args).await,
    }
}
