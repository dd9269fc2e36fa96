use candid::Principal;

use super::error::CliError;
use super::input::parse_hex;

pub struct PrincipalArgs {
    pub input: String,
}

pub fn run(args: PrincipalArgs) {
    match render(&args.input) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Text input prints hex bytes, hex input prints the text form.
///
/// Text containing a dash is always treated as a principal text; anything
/// else is tried as hex first.
pub fn render(input: &str) -> Result<String, CliError> {
    let input = input.trim();
    let bytes = match input.contains('-') {
        true => None,
        false => parse_hex(input).ok(),
    };
    if let Some(bytes) = bytes {
        return Ok(Principal::from_slice(&bytes)?.to_text());
    }

    let principal = Principal::from_text(input)?;
    let mut out = hex::encode(principal.as_slice());
    if let Some(class) = principal.class() {
        out.push_str(&format!(" ({})", class.name()));
    }
    Ok(out)
}
