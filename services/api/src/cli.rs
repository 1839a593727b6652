use crate::commands::{run_audit, run_every_model, run_single_model, AuditArgs, BatchArgs, RunArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use evalu8::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "evalu8",
    about = "Run applicant selection models and audit their shortlists for disparity",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one selection model and print the shortlisted names as JSON
    Run(RunArgs),
    /// Run every selection model and print a model-to-names JSON map
    RunAll(BatchArgs),
    /// Run a model and print its fairness and robustness audit
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
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
        Command::Run(args) => run_single_model(args),
        Command::RunAll(args) => run_every_model(args),
        Command::Audit(args) => run_audit(args),
    }
}
