use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use serde_json::Value;
use synclink_client::{ClientConfig, DaemonClient};
use synclink_proto::SignalKind;

use crate::cmd::WatchArgs;
use crate::exit::{client_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_signal, OutputFormat};

const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let kinds: Vec<SignalKind> = match args.signal {
        Some(num) => {
            let kind = SignalKind::from_num(num)
                .ok_or_else(|| CliError::new(USAGE, format!("unknown signal num: {num}")))?;
            vec![kind]
        }
        None => SignalKind::ALL.to_vec(),
    };

    let client = DaemonClient::connect_with(ClientConfig {
        port_file: args.port_file.clone(),
        wire: args.wire.to_wire_config(),
        ..ClientConfig::default()
    })
    .map_err(|err| client_error("connect failed", err))?;

    let (events_tx, events_rx) = mpsc::channel::<(i32, Value)>();
    for kind in kinds {
        let events_tx = events_tx.clone();
        client.subscribe(kind, move |event| {
            let _ = events_tx.send((event.kind.num(), event.params.clone()));
        });
    }
    drop(events_tx);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(Arc::clone(&running))?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        if !client.is_connected() {
            return Err(CliError::new(
                crate::exit::TRANSPORT_ERROR,
                "connection to daemon lost",
            ));
        }

        match events_rx.recv_timeout(DRAIN_INTERVAL) {
            Ok((num, params)) => {
                print_signal(num, &params, format);
                printed = printed.saturating_add(1);
                if let Some(count) = args.count {
                    if printed >= count {
                        return Ok(SUCCESS);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
