use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use synclink_proto::{RequestKind, SignalKind};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReplyOutput<'a> {
    schema_id: &'a str,
    num: i32,
    kind: String,
    result: &'a Value,
}

pub fn print_reply(num: i32, result: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReplyOutput {
                schema_id: "https://schemas.synclink.dev/cli/v1/call-reply.schema.json",
                num,
                kind: request_kind_name(num),
                result,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NUM", "KIND", "RESULT"])
                .add_row(vec![
                    num.to_string(),
                    request_kind_name(num),
                    compact_json(result),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "num={} ({}) result={}",
                num,
                request_kind_name(num),
                compact_json(result)
            );
        }
        OutputFormat::Raw => {
            print_raw(compact_json(result).as_bytes());
            println!();
        }
    }
}

#[derive(Serialize)]
struct SignalOutput<'a> {
    schema_id: &'a str,
    num: i32,
    kind: String,
    params: &'a Value,
}

pub fn print_signal(num: i32, params: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SignalOutput {
                schema_id: "https://schemas.synclink.dev/cli/v1/signal-received.schema.json",
                num,
                kind: signal_kind_name(num),
                params,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NUM", "SIGNAL", "PARAMS"])
                .add_row(vec![
                    num.to_string(),
                    signal_kind_name(num),
                    compact_json(params),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "signal={} ({}) params={}",
                num,
                signal_kind_name(num),
                compact_json(params)
            );
        }
        OutputFormat::Raw => {
            print_raw(compact_json(params).as_bytes());
            println!();
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn request_kind_name(num: i32) -> String {
    match RequestKind::from_num(num) {
        Some(kind) => format!("{kind:?}"),
        None => "UNKNOWN".to_string(),
    }
}

pub fn signal_kind_name(num: i32) -> String {
    match SignalKind::from_num(num) {
        Some(kind) => format!("{kind:?}"),
        None => "UNKNOWN".to_string(),
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
