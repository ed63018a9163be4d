use crate::commands::{run_assign, run_inspect, AssignArgs, InspectArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "roster-placement",
    about = "Assign employees to work locations, balancing FTE per role and honouring preferences",
    version
)]
struct Cli {
    /// Log every individual move (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed, optimize and write the location assignment (default command)
    Assign(AssignArgs),
    /// Show the roles and locations discovered in the employee file
    Inspect(InspectArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, cli.verbose)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Assign(AssignArgs::default()));

    match command {
        Command::Assign(args) => run_assign(&config, args).map(|_| ()),
        Command::Inspect(args) => run_inspect(&config, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_is_optional_and_parses_flags() {
        let cli = Cli::try_parse_from(["roster-placement"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from([
            "roster-placement",
            "assign",
            "--input",
            "staff.csv",
            "--seed",
            "42",
            "--json",
            "--dry-run",
            "-v",
        ])
        .expect("parses");
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Assign(args)) => {
                assert_eq!(args.seed, Some(42));
                assert!(args.json);
                assert!(args.dry_run);
                assert_eq!(
                    args.input.as_deref(),
                    Some(std::path::Path::new("staff.csv"))
                );
            }
            other => panic!("expected assign command, got {other:?}"),
        }
    }
}
