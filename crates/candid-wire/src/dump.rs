//! Human-readable type table dump.

use std::fmt::Write as _;

use candid_core::Colors;

use crate::type_table::{TypeEntry, TypeRef, TypeTable};

/// Render the table and argument list, one entry per line.
pub fn dump(table: &TypeTable, colors: Colors) -> String {
    let mut out = String::new();
    let ctx = DumpContext {
        width: width_for_count(table.len()),
        colors,
    };

    writeln!(out, "{}[types]{}", colors.blue, colors.reset).unwrap();
    for (i, entry) in table.entries().iter().enumerate() {
        writeln!(out, "{} {}", ctx.index(i as u32), ctx.entry(entry)).unwrap();
    }

    writeln!(out, "{}[args]{}", colors.blue, colors.reset).unwrap();
    let arg_width = width_for_count(table.args().len());
    for (i, &arg) in table.args().iter().enumerate() {
        writeln!(
            out,
            "{}A{:0arg_width$}{} {}",
            colors.dim,
            i,
            colors.reset,
            ctx.type_ref(arg)
        )
        .unwrap();
    }
    out
}

/// Digits needed to print indices `0..count`.
pub fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        (count - 1).ilog10() as usize + 1
    }
}

struct DumpContext {
    width: usize,
    colors: Colors,
}

impl DumpContext {
    fn index(&self, index: u32) -> String {
        let c = &self.colors;
        format!("{}T{:0w$}{}", c.dim, index, c.reset, w = self.width)
    }

    fn type_ref(&self, r: TypeRef) -> String {
        match r {
            TypeRef::Primitive(op) => op.name().to_string(),
            TypeRef::Index(index) => self.index(index),
        }
    }

    fn entry(&self, entry: &TypeEntry) -> String {
        let c = &self.colors;
        match entry {
            TypeEntry::Opt(inner) => format!("opt {}", self.type_ref(*inner)),
            TypeEntry::Vec(inner) => format!("vec {}", self.type_ref(*inner)),
            TypeEntry::Record(fields) | TypeEntry::Variant(fields) => {
                let keyword = entry.opcode().name();
                if fields.is_empty() {
                    return format!("{keyword} {{}}");
                }
                let body: Vec<String> = fields
                    .iter()
                    .map(|(hash, r)| {
                        format!("{}{hash}{} : {}", c.blue, c.reset, self.type_ref(*r))
                    })
                    .collect();
                format!("{keyword} {{ {} }}", body.join("; "))
            }
            TypeEntry::Func { args, rets, modes } => {
                let list = |refs: &[TypeRef]| {
                    refs.iter()
                        .map(|r| self.type_ref(*r))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let mut s = format!("func ({}) -> ({})", list(args), list(rets));
                for mode in modes {
                    s.push(' ');
                    s.push_str(mode.name());
                }
                s
            }
            TypeEntry::Service(methods) => {
                if methods.is_empty() {
                    return "service {}".to_string();
                }
                let body: Vec<String> = methods
                    .iter()
                    .map(|(name, r)| {
                        format!("{}{name}{} : {}", c.green, c.reset, self.type_ref(*r))
                    })
                    .collect();
                format!("service {{ {} }}", body.join("; "))
            }
        }
    }
}
