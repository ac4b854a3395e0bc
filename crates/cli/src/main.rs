mod cmd;

use argp::FromArgs;
use dispatch_wait_core::actions::{self, ActionEnv};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Trigger a repository dispatch event and wait for the workflow run it
/// produces to complete.
struct TopLevel {
    #[argp(subcommand)]
    command: Command,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
#[argp(subcommand)]
enum Command {
    Run(cmd::run::Args),
    Dispatch(cmd::dispatch::Args),
    Wait(cmd::wait::Args),
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::builder()
        // Default to info level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: TopLevel = argp::parse_args_or_exit(argp::DEFAULT);
    let env = ActionEnv::from_env();
    let result = match args.command {
        Command::Run(args) => cmd::run::run(args, &env).await,
        Command::Dispatch(args) => cmd::dispatch::run(args, &env).await,
        Command::Wait(args) => cmd::wait::run(args, &env).await,
    };
    if let Err(e) = result {
        // Single failure path: annotate the workflow log and exit non-zero.
        actions::error(&format!("{e:#}"));
        tracing::error!("{:?}", e);
        std::process::exit(1);
    }
}
