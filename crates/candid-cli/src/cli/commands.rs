//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("candid")
        .about("Inspect Candid binary messages")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(decode_command())
        .subcommand(dump_command())
        .subcommand(hash_command())
        .subcommand(principal_command())
}

/// Decode a message and print its arguments.
pub fn decode_command() -> Command {
    Command::new("decode")
        .about("Decode a message and print its arguments")
        .override_usage(
            "\
  candid decode <HEX>
  candid decode --file <PATH>",
        )
        .after_help(
            r#"EXAMPLES:
  candid decode 4449444c00017e01              # (true)
  candid decode 4449444c00017e01 --types      # (true : bool)
  candid decode -f msg.bin --json --pretty    # JSON array of values
  candid decode -f - < msg.hex                # hex text on stdin"#,
        )
        .arg(hex_arg())
        .arg(file_arg())
        .arg(json_arg())
        .arg(pretty_arg())
        .arg(types_arg())
        .arg(fuel_arg())
        .arg(recursion_limit_arg())
        .arg(color_arg())
}

/// Print the type table of a message.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Print the type table of a message")
        .override_usage(
            "\
  candid dump <HEX>
  candid dump --file <PATH>",
        )
        .arg(hex_arg())
        .arg(file_arg())
        .arg(color_arg())
}

/// Print label hashes.
pub fn hash_command() -> Command {
    Command::new("hash")
        .about("Print the field hash of each name")
        .after_help(
            r#"EXAMPLES:
  candid hash foo bar    # 5097222 foo, 4895187 bar"#,
        )
        .arg(names_arg())
}

/// Convert a principal between text and hex.
pub fn principal_command() -> Command {
    Command::new("principal")
        .about("Convert a principal between text and hex form")
        .after_help(
            r#"EXAMPLES:
  candid principal 2vxsx-fae    # 04 (anonymous)
  candid principal caffee       # w7x7r-cok77-xa"#,
        )
        .arg(principal_arg())
}
