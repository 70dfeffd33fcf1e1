use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use synclink_frame::{Framing, TextEncoding, WireConfig};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod call;
pub mod doctor;
pub mod status;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show daemon port discovery and connectivity.
    Status(StatusArgs),
    /// Send one request and print the reply.
    Call(CallArgs),
    /// Subscribe to daemon signals and print them as they arrive.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Status(args) => status::run(args, format),
        Command::Call(args) => call::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
    }
}

/// Wire variant flags shared by the connection-opening commands.
#[derive(Args, Debug, Clone)]
pub struct WireArgs {
    /// Framing scheme the daemon speaks.
    #[arg(long, value_enum, default_value = "length-prefixed")]
    pub framing: FramingArg,
    /// Text encoding the daemon speaks.
    #[arg(long, value_enum, default_value = "utf8")]
    pub encoding: EncodingArg,
}

impl WireArgs {
    pub fn to_wire_config(&self) -> WireConfig {
        WireConfig {
            framing: match self.framing {
                FramingArg::LengthPrefixed => Framing::LengthPrefixed,
                FramingArg::BraceDelimited => Framing::BraceDelimited,
            },
            encoding: match self.encoding {
                EncodingArg::Utf8 => TextEncoding::Utf8,
                EncodingArg::Utf16le => TextEncoding::Utf16Le,
            },
            ..WireConfig::default()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FramingArg {
    LengthPrefixed,
    BraceDelimited,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EncodingArg {
    Utf8,
    Utf16le,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Port file path. Default: the per-user location.
    #[arg(long, env = "SYNCLINKD_PORT_FILE")]
    pub port_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Request discriminant to send.
    #[arg(long, short = 'n')]
    pub num: i32,
    /// JSON parameters object.
    #[arg(long, default_value = "{}")]
    pub params: String,
    /// Maximum time to wait for the reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    /// Port file path. Default: the per-user location.
    #[arg(long, env = "SYNCLINKD_PORT_FILE")]
    pub port_file: Option<PathBuf>,
    #[command(flatten)]
    pub wire: WireArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Only print this signal discriminant. Default: all signals.
    #[arg(long)]
    pub signal: Option<i32>,
    /// Exit after printing N signals.
    #[arg(long)]
    pub count: Option<usize>,
    /// Port file path. Default: the per-user location.
    #[arg(long, env = "SYNCLINKD_PORT_FILE")]
    pub port_file: Option<PathBuf>,
    #[command(flatten)]
    pub wire: WireArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    /// Port file path. Default: the per-user location.
    #[arg(long, env = "SYNCLINKD_PORT_FILE")]
    pub port_file: Option<PathBuf>,
}
