use std::net::TcpStream;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use synclink_transport::PortFile;

use crate::cmd::StatusArgs;
use crate::exit::{connect_error, CliResult, FAILURE, SUCCESS};
use crate::output::OutputFormat;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct StatusOutput {
    schema_id: &'static str,
    port_file: String,
    port: u16,
    reachable: bool,
}

pub fn run(args: StatusArgs, format: OutputFormat) -> CliResult<i32> {
    let port_file = match &args.port_file {
        Some(path) => PortFile::at(path),
        None => PortFile::default_location()
            .map_err(|err| connect_error("port file lookup failed", err))?,
    };

    let port = port_file
        .read_port()
        .map_err(|err| connect_error("port discovery failed", err))?;

    let reachable = TcpStream::connect_timeout(
        &std::net::SocketAddr::from(([127, 0, 0, 1], port)),
        PROBE_TIMEOUT,
    )
    .is_ok();

    let output = StatusOutput {
        schema_id: "https://schemas.synclink.dev/cli/v1/status-report.schema.json",
        port_file: port_file.path().display().to_string(),
        port,
        reachable,
    };
    print_status(&output, format);

    if reachable {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}

fn print_status(output: &StatusOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT FILE", "PORT", "REACHABLE"])
                .add_row(vec![
                    output.port_file.clone(),
                    output.port.to_string(),
                    output.reachable.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "port_file={} port={} reachable={}",
                output.port_file, output.port, output.reachable
            );
        }
    }
}
