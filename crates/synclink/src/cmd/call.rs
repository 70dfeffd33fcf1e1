use std::time::Duration;

use synclink_client::{CallOptions, CancelToken, ClientConfig, DaemonClient};

use crate::cmd::CallArgs;
use crate::exit::{call_error, client_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|err| CliError::new(USAGE, format!("--params is not valid JSON: {err}")))?;
    if !params.is_object() {
        return Err(CliError::new(USAGE, "--params must be a JSON object"));
    }

    let client = DaemonClient::connect_with(ClientConfig {
        port_file: args.port_file.clone(),
        wire: args.wire.to_wire_config(),
        ..ClientConfig::default()
    })
    .map_err(|err| client_error("connect failed", err))?;

    let token = CancelToken::new();
    install_ctrlc_handler(token.clone())?;

    let result = client
        .call_num(
            args.num,
            params,
            CallOptions {
                timeout: Some(timeout),
                cancel: Some(token),
            },
        )
        .map_err(|err| call_error("call failed", err))?;

    print_reply(args.num, &result, format);
    Ok(SUCCESS)
}

fn install_ctrlc_handler(token: CancelToken) -> CliResult<()> {
    ctrlc::set_handler(move || token.cancel()).map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
