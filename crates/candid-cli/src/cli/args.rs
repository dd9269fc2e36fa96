//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Hex-encoded message (positional).
pub fn hex_arg() -> Arg {
    Arg::new("hex")
        .value_name("HEX")
        .help("Hex-encoded message, starting with 4449444c")
}

/// Message file (--file).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .short('f')
        .long("file")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("hex")
        .help("Read the message from a file, raw or hex (use \"-\" for stdin)")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print values as JSON")
}

/// Pretty-print JSON (--pretty).
pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .requires("json")
        .help("Pretty-print JSON output")
}

/// Annotate values with types (--types).
pub fn types_arg() -> Arg {
    Arg::new("types")
        .short('t')
        .long("types")
        .action(ArgAction::SetTrue)
        .conflicts_with("json")
        .help("Annotate each value with its decoded type")
}

/// Decoding fuel (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Maximum number of values to decode")
}

/// Recursion limit (--recursion-limit).
pub fn recursion_limit_arg() -> Arg {
    Arg::new("recursion_limit")
        .long("recursion-limit")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Maximum value nesting depth")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Field names to hash (positional, one or more).
pub fn names_arg() -> Arg {
    Arg::new("names")
        .value_name("NAME")
        .required(true)
        .num_args(1..)
        .help("Field or method names")
}

/// Principal in text or hex form (positional).
pub fn principal_arg() -> Arg {
    Arg::new("principal")
        .value_name("PRINCIPAL")
        .required(true)
        .help("Principal as text (aaaaa-aa) or hex bytes")
}

/// Verbosity (-v, repeatable, global).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log to stderr (-v info, -vv debug, -vvv trace)")
}
