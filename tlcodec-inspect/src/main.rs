//! Decode hex dumps of TL objects through the constructor registry.
//!
//! # Run
//! ```text
//! cargo run -p tlcodec-inspect -- d225 2c2c 2a00 0000 0000 0000
//! echo 5e7d0ea4... | cargo run -p tlcodec-inspect -- -
//! ```
//!
//! Every argument (or each stdin line for `-`) is one object. Whitespace and
//! an optional `0x` prefix are ignored. `--layer N` re-encodes at layer `N`
//! instead of the newest one when checking the round trip.

use std::io::{self, BufRead};

use tlcodec_types::{EncodeContext, Registry, LAYER};

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
struct Args {
    layer: i32,
    inputs: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut layer = LAYER;
    let mut inputs = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--layer" {
            let value = args.next().ok_or("--layer needs a value")?;
            layer = value.parse().map_err(|_| format!("bad layer: {value}"))?;
        } else {
            inputs.push(arg);
        }
    }
    if inputs.is_empty() {
        return Err("usage: tl-inspect [--layer N] <hex>... | -".into());
    }
    Ok(Args { layer, inputs })
}

fn decode_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    hex::decode(cleaned)
}

// ── Inspection ────────────────────────────────────────────────────────────────

fn inspect(input: &str, layer: i32) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = decode_hex(input)?;
    let registry = Registry::global();

    if let Some(tag) = bytes.get(..4) {
        let tag = u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]);
        let name = tlcodec_types::name_for_id(tag).unwrap_or("<unknown>");
        println!("tag {tag:#010x} ({name}), {} bytes", bytes.len());
    }

    let object = registry.decode_bytes(&bytes)?;
    println!("{object:#?}");

    match object.encode(EncodeContext::strict(layer)) {
        Ok(again) if again == bytes => println!("✓ re-encodes identically at layer {layer}"),
        Ok(again) => println!("≠ layer {layer} re-encode differs: {}", hex::encode(again)),
        Err(e) => println!("✗ cannot re-encode at layer {layer}: {e}"),
    }
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("tlcodec_types=info,tl_inspect=info"),
    )
    .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    log::debug!("registry holds {} constructors", Registry::global().len());

    let mut failed = false;
    for input in &args.inputs {
        let lines: Vec<String> = if input == "-" {
            io::stdin().lock().lines().map_while(Result::ok).collect()
        } else {
            vec![input.clone()]
        };
        for line in lines.iter().filter(|l| !l.trim().is_empty()) {
            if let Err(e) = inspect(line, args.layer) {
                log::error!("{line}: {e}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
