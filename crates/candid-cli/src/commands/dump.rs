use std::path::PathBuf;

use candid::{Colors, Reader, TypeTable, dump};

use super::error::CliError;
use super::input::load_message;

pub struct DumpArgs {
    pub hex: Option<String>,
    pub file: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let result = load_message(args.hex.as_deref(), args.file.as_deref())
        .and_then(|bytes| render(&bytes, args.color));
    match result {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Only the type table is parsed; value bytes are not inspected.
pub fn render(bytes: &[u8], color: bool) -> Result<String, CliError> {
    let mut reader = Reader::new(bytes);
    let table = TypeTable::parse(&mut reader)?;
    tracing::info!(
        types = table.len(),
        value_bytes = reader.remaining(),
        "parsed type table"
    );
    Ok(dump(&table, Colors::new(color)))
}
