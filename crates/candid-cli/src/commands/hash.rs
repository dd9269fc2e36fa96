use std::fmt::Write;

use candid::idl_hash;

pub struct HashArgs {
    pub names: Vec<String>,
}

pub fn run(args: HashArgs) {
    print!("{}", render(&args.names));
}

/// One `<hash> <name>` line per name.
pub fn render(names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        writeln!(out, "{} {}", idl_hash(name), name).unwrap();
    }
    out
}
