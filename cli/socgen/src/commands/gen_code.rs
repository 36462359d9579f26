//! `socgen gen-code`: emit C for a register operation sequence.

use std::path::Path;

use anyhow::{Context, Result};
use socgen_codegen::{gen_code, parse_sequence};

use super::Workspace;

pub fn run(ws: &Workspace, sequence: &str, datamodel: Option<&str>, value: i64, indent: &str) -> Result<()> {
    let soc = ws.datamodel(datamodel)?;
    let path = Path::new(sequence);
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let steps = parse_sequence(&json).with_context(|| format!("parsing {}", path.display()))?;
    let code = gen_code(&soc, indent, &steps, value)
        .with_context(|| format!("generating code for {} on {}", path.display(), soc.name))?;
    println!("{code}");
    Ok(())
}
