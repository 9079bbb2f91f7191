//! CLI that fetches a profitability page and prints the aggregated factors
//! as JSON.
//!
//! Usage: `wtm_factor <base-url> [gpu=count ...]`
//!
//! GPUs are given by checkbox id (`adapt_1080Ti`) or its suffix (`1080Ti`).
//! Without any GPU argument the page's rendered values are printed instead.
//! Set `RUST_LOG=debug` for request logging.

use std::env;
use std::io::{self, Write};
use std::process;

use tracing_subscriber::EnvFilter;
use wtm_factor::{AlgorithmMap, Inventory, Options, WtmFactor};

fn parse_gpu_arg(arg: &str) -> Result<(&str, u32), String> {
    let (id, count) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected gpu=count, got `{arg}`"))?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad count in `{arg}`: {e}"))?;
    Ok((id, count))
}

/// Write `algorithms` as pretty JSON followed by a newline.
fn write_json<W: Write>(mut out: W, algorithms: &AlgorithmMap) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut out, algorithms)
        .map_err(|e| format!("error writing result: {e}"))?;
    writeln!(out).map_err(|e| format!("error writing result: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(base_url) = args.next() else {
        eprintln!("usage: wtm_factor <base-url> [gpu=count ...]");
        process::exit(2);
    };

    let args: Vec<String> = args.collect();
    let inventory = args
        .iter()
        .map(|a| parse_gpu_arg(a))
        .collect::<Result<Vec<_>, String>>()
        .and_then(|gpus| Inventory::from_gpu_ids(gpus).map_err(|e| e.to_string()));
    let inventory = match inventory {
        Ok(inventory) => inventory,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let client = match WtmFactor::new(&base_url, Options::default()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let result = if inventory.is_empty() {
        client.fetch_rendered()
    } else {
        client.extract(&inventory)
    };

    match result {
        Ok(algorithms) => {
            if let Err(e) = write_json(io::stdout().lock(), &algorithms) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error ({:?} stage): {e}", e.stage());
            process::exit(1);
        }
    }
}
