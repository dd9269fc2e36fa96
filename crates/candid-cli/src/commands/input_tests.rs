use std::path::Path;

use super::error::CliError;
use super::input::{load_message, parse_hex};

#[test]
fn hex_ignores_whitespace_and_prefix() {
    assert_eq!(parse_hex("0x4449 444c\n").unwrap(), b"DIDL".to_vec());
    assert_eq!(parse_hex("4449444C").unwrap(), b"DIDL".to_vec());
}

#[test]
fn invalid_hex() {
    assert!(matches!(parse_hex("zz").unwrap_err(), CliError::Hex(_)));
    assert!(matches!(parse_hex("444").unwrap_err(), CliError::Hex(_)));
}

#[test]
fn inline_hex_wins() {
    let bytes = load_message(Some("4449444c0000"), None).unwrap();
    assert_eq!(bytes, b"DIDL\x00\x00".to_vec());
}

#[test]
fn missing_input() {
    assert!(matches!(
        load_message(None, None).unwrap_err(),
        CliError::MissingInput
    ));
}

#[test]
fn unreadable_file() {
    let err = load_message(None, Some(Path::new("/nonexistent/message.bin"))).unwrap_err();
    assert!(err.to_string().starts_with("failed to read '/nonexistent/message.bin'"));
}
