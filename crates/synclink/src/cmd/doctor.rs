use std::net::TcpStream;
use std::time::Duration;

use serde::Serialize;
use synclink_transport::PortFile;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let port_file = resolve_port_file(&args);

    let (port_check, port) = port_file_check(&port_file);
    let daemon_check = match port {
        Some(port) => daemon_reachable_check(port),
        None => CheckResult {
            name: "daemon_reachable".to_string(),
            status: CheckStatus::Warn,
            detail: "skipped, no port discovered".to_string(),
        },
    };
    let checks = vec![port_check, daemon_check, temp_dir_writable_check()];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.synclink.dev/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };
    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn resolve_port_file(args: &DoctorArgs) -> Option<PortFile> {
    match &args.port_file {
        Some(path) => Some(PortFile::at(path)),
        None => PortFile::default_location().ok(),
    }
}

fn port_file_check(port_file: &Option<PortFile>) -> (CheckResult, Option<u16>) {
    let Some(port_file) = port_file else {
        return (
            CheckResult {
                name: "port_file".to_string(),
                status: CheckStatus::Fail,
                detail: "cannot locate home directory".to_string(),
            },
            None,
        );
    };

    match port_file.read_port() {
        Ok(port) => (
            CheckResult {
                name: "port_file".to_string(),
                status: CheckStatus::Pass,
                detail: format!("{} -> port {port}", port_file.path().display()),
            },
            Some(port),
        ),
        Err(err) => (
            CheckResult {
                name: "port_file".to_string(),
                status: CheckStatus::Fail,
                detail: err.to_string(),
            },
            None,
        ),
    }
}

fn daemon_reachable_check(port: u16) -> CheckResult {
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match TcpStream::connect_timeout(&addr, PROBE_TIMEOUT) {
        Ok(_) => CheckResult {
            name: "daemon_reachable".to_string(),
            status: CheckStatus::Pass,
            detail: format!("localhost:{port} accepted a connection"),
        },
        Err(err) => CheckResult {
            name: "daemon_reachable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("localhost:{port}: {err}"),
        },
    }
}

fn temp_dir_writable_check() -> CheckResult {
    let path = std::env::temp_dir().join(format!("synclink-doctor-{}", std::process::id()));
    match std::fs::write(&path, b"probe") {
        Ok(()) => {
            let _ = std::fs::remove_file(&path);
            CheckResult {
                name: "temp_dir_writable".to_string(),
                status: CheckStatus::Pass,
                detail: std::env::temp_dir().display().to_string(),
            }
        }
        Err(err) => CheckResult {
            name: "temp_dir_writable".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("synclink doctor\n");
            for check in &output.checks {
                println!("  {:<20} {:?}  {}", check.name, check.status, check.detail);
            }
            println!("\noverall: {}", output.overall);
        }
    }
}
