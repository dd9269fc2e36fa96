mod cli;
mod commands;
mod logging;

use cli::{DecodeParams, DumpParams, HashParams, PrincipalParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    logging::init(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("decode", m)) => {
            let params = DecodeParams::from_matches(m);
            commands::decode::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("hash", m)) => {
            let params = HashParams::from_matches(m);
            commands::hash::run(params.into());
        }
        Some(("principal", m)) => {
            let params = PrincipalParams::from_matches(m);
            commands::principal::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
