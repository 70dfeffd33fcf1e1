mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "synclink", version, about = "Sync daemon connection CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

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

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
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
    fn parses_call_subcommand() {
        let cli = Cli::try_parse_from([
            "synclink",
            "call",
            "--num",
            "7",
            "--params",
            "{\"x\":1}",
            "--timeout",
            "2s",
        ])
        .expect("call args should parse");

        assert!(matches!(cli.command, Command::Call(_)));
    }

    #[test]
    fn parses_watch_with_signal_filter() {
        let cli = Cli::try_parse_from(["synclink", "watch", "--signal", "15", "--count", "3"])
            .expect("watch args should parse");

        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.signal, Some(15));
                assert_eq!(args.count, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_wire_variant_flags() {
        let cli = Cli::try_parse_from([
            "synclink",
            "call",
            "--num",
            "1",
            "--framing",
            "brace-delimited",
            "--encoding",
            "utf16le",
        ])
        .expect("wire flags should parse");

        match cli.command {
            Command::Call(args) => {
                let wire = args.wire.to_wire_config();
                assert_eq!(wire.framing, synclink_frame::Framing::BraceDelimited);
                assert_eq!(wire.encoding, synclink_frame::TextEncoding::Utf16Le);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_status_subcommand() {
        let cli = Cli::try_parse_from(["synclink", "status"]).expect("status args should parse");
        assert!(matches!(cli.command, Command::Status(_)));
    }
}
