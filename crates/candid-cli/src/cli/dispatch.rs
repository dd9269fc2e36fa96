//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::decode::DecodeArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::hash::HashArgs;
use crate::commands::principal::PrincipalArgs;

pub struct DecodeParams {
    pub hex: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub pretty: bool,
    pub types: bool,
    pub fuel: Option<u64>,
    pub recursion_limit: Option<u32>,
    pub color: ColorChoice,
}

impl DecodeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            hex: m.get_one::<String>("hex").cloned(),
            file: m.get_one::<PathBuf>("file").cloned(),
            json: m.get_flag("json"),
            pretty: m.get_flag("pretty"),
            types: m.get_flag("types"),
            fuel: m.get_one::<u64>("fuel").copied(),
            recursion_limit: m.get_one::<u32>("recursion_limit").copied(),
            color: parse_color(m),
        }
    }
}

impl From<DecodeParams> for DecodeArgs {
    fn from(p: DecodeParams) -> Self {
        Self {
            hex: p.hex,
            file: p.file,
            json: p.json,
            pretty: p.pretty,
            types: p.types,
            fuel: p.fuel,
            recursion_limit: p.recursion_limit,
            // JSON output is never colorized.
            color: !p.json && p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub hex: Option<String>,
    pub file: Option<PathBuf>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            hex: m.get_one::<String>("hex").cloned(),
            file: m.get_one::<PathBuf>("file").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            hex: p.hex,
            file: p.file,
            color: p.color.should_colorize(),
        }
    }
}

pub struct HashParams {
    pub names: Vec<String>,
}

impl HashParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            names: m
                .get_many::<String>("names")
                .map(|names| names.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

impl From<HashParams> for HashArgs {
    fn from(p: HashParams) -> Self {
        Self { names: p.names }
    }
}

pub struct PrincipalParams {
    pub principal: String,
}

impl PrincipalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            principal: m.get_one::<String>("principal").cloned().unwrap_or_default(),
        }
    }
}

impl From<PrincipalParams> for PrincipalArgs {
    fn from(p: PrincipalParams) -> Self {
        Self { input: p.principal }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
