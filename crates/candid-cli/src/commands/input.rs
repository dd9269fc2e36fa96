use std::fs;
use std::io::{self, Read};
use std::path::Path;

use candid::MAGIC;

use super::error::CliError;

/// Load message bytes from inline hex or a file.
///
/// Files holding a raw message (starting with `DIDL`) are used as is; any
/// other file content is read as hex text.
pub fn load_message(hex: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>, CliError> {
    if let Some(text) = hex {
        return parse_hex(text);
    }

    let Some(path) = file else {
        return Err(CliError::MissingInput);
    };
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|source| CliError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        buf
    } else {
        fs::read(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?
    };

    if bytes.starts_with(&MAGIC) {
        return Ok(bytes);
    }
    parse_hex(&String::from_utf8_lossy(&bytes))
}

/// Decode hex text, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    Ok(hex::decode(digits)?)
}
