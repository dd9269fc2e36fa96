use std::path::PathBuf;

use candid::{Colors, DecodeLimits, Decoder, TypedValue, format_args};

use super::error::CliError;
use super::input::load_message;

pub struct DecodeArgs {
    pub hex: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub pretty: bool,
    pub types: bool,
    pub fuel: Option<u64>,
    pub recursion_limit: Option<u32>,
    pub color: bool,
}

pub fn run(args: DecodeArgs) {
    let result = load_message(args.hex.as_deref(), args.file.as_deref())
        .and_then(|bytes| render(&bytes, &args));
    match result {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn render(bytes: &[u8], args: &DecodeArgs) -> Result<String, CliError> {
    let decoder = Decoder::builder().limits(limits_for(args)).build();
    let values = decoder.decode(bytes, None)?;
    tracing::info!(args = values.len(), bytes = bytes.len(), "decoded message");

    if args.json {
        return render_json(&values, args.pretty);
    }
    Ok(format_args(&values, args.types, Colors::new(args.color)))
}

fn limits_for(args: &DecodeArgs) -> DecodeLimits {
    let mut limits = DecodeLimits::new();
    if let Some(fuel) = args.fuel {
        limits = limits.fuel(fuel);
    }
    if let Some(limit) = args.recursion_limit {
        limits = limits.recursion_limit(limit);
    }
    limits
}

fn render_json(values: &[TypedValue], pretty: bool) -> Result<String, CliError> {
    let values: Vec<_> = values.iter().map(TypedValue::value).collect();
    let out = if pretty {
        serde_json::to_string_pretty(&values)?
    } else {
        serde_json::to_string(&values)?
    };
    Ok(out)
}
