mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rrtrans", version, about = "Remote frame transport CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    output: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.output.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "rrtrans",
            "send",
            "localhost",
            "--port",
            "4242",
            "--format",
            "bgra",
            "--stereo",
            "--subsamp",
            "420",
        ])
        .expect("send args should parse");

        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.port, 4242);
        assert_eq!(args.width, 640);
        assert!(args.stereo);
        assert!(!args.sync);
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let err = Cli::try_parse_from([
            "rrtrans",
            "send",
            "localhost",
            "--port",
            "4242",
            "--quality",
            "0",
        ])
        .expect_err("quality 0 should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_zero_frames() {
        let err = Cli::try_parse_from([
            "rrtrans",
            "send",
            "localhost",
            "--port",
            "4242",
            "--frames",
            "0",
        ])
        .expect_err("zero frames should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn send_requires_port() {
        let err = Cli::try_parse_from(["rrtrans", "send", "localhost"])
            .expect_err("missing port should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_formats_subcommand() {
        let cli = Cli::try_parse_from(["rrtrans", "--output", "json", "formats", "--compress", "rgb"])
            .expect("formats args should parse");
        assert!(matches!(cli.command, Command::Formats(_)));
        assert!(matches!(cli.output, Some(OutputFormat::Json)));
    }
}
