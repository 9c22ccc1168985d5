use crate::play::{run_evaluate, run_levels, run_play, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mind_blown::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mind-Blown Diagnostic",
    about = "Find out how thoroughly your mind was blown, over HTTP or in the terminal",
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
    /// Take the diagnostic interactively, one question at a time
    Play,
    /// Classify a snapshot of answers such as "E=yes,R=whoa,Q3=no"
    Evaluate(EvaluateArgs),
    /// Print the five levels with their descriptions
    Levels,
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
        Command::Play => run_play(),
        Command::Evaluate(args) => run_evaluate(args),
        Command::Levels => run_levels(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["mind-blown"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_parses_the_answer_snapshot() {
        let cli = Cli::try_parse_from(["mind-blown", "evaluate", "--answers", "E=no", "--json"])
            .expect("parses");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert!(args.json);
                assert_eq!(args.answers.as_deref(), Some("E=no"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn evaluate_defaults_to_an_empty_snapshot() {
        let cli = Cli::try_parse_from(["mind-blown", "evaluate"]).expect("parses");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert!(args.answers.is_none());
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
