use crate::commands::{run_match, run_quote, MatchArgs, QuoteArgs};
use crate::server;
use auto_quote::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "auto-quote",
    about = "Serve financing quotes and vehicle matches, or run them from the command line",
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
    /// Price a loan or lease menu for a credit profile
    Quote(QuoteArgs),
    /// Rank the vehicle catalog against stated preferences
    Match(MatchArgs),
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
        Command::Quote(args) => run_quote(args),
        Command::Match(args) => run_match(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auto_quote::workflows::matching::{BodyStyle, EngineType};

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["auto-quote"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn quote_flags_parse() {
        let cli = Cli::try_parse_from([
            "auto-quote",
            "quote",
            "--credit-score",
            "742",
            "--monthly-income",
            "5200",
            "--vehicle-price",
            "31995",
            "--lease",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Quote(args)) => {
                assert_eq!(args.credit_score, 742);
                assert_eq!(args.vehicle_price, 31995.0);
                assert!(args.lease);
            }
            other => panic!("expected quote command, got {other:?}"),
        }
    }

    #[test]
    fn match_flags_accept_labels_in_any_case() {
        let cli = Cli::try_parse_from([
            "auto-quote",
            "match",
            "--body-style",
            "suv",
            "--body-style",
            "Mini-van",
            "--engine-type",
            "HYBRID",
            "--seat-count",
            "7",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Match(args)) => {
                assert_eq!(args.body_style, vec![BodyStyle::Suv, BodyStyle::Minivan]);
                assert_eq!(args.engine_type, vec![EngineType::Hybrid]);
                assert_eq!(args.seat_count, Some(7));
            }
            other => panic!("expected match command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert!(Cli::try_parse_from(["auto-quote", "match", "--drive-type", "4x4"]).is_err());
    }

    #[test]
    fn negative_seat_count_is_passed_through() {
        let cli =
            Cli::try_parse_from(["auto-quote", "match", "--seat-count", "-1"]).expect("parses");
        match cli.command {
            Some(Command::Match(args)) => assert_eq!(args.to_query().minimum_seats(), None),
            other => panic!("expected match command, got {other:?}"),
        }
    }
}
