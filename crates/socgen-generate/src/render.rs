//! Template rendering.
//!
//! Template files are minijinja templates rendered with the generation
//! context bound as `context`. Besides the context's own fields, templates
//! see `context.relativeFilePath`, the interpolated `dst` of the map being
//! rendered. Trailing newlines are kept, and a `hex` filter formats integers
//! as `0x..` for register code.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use minijinja::Environment;
use serde_json::{json, Value};
use socgen_model::FileMap;

use crate::dest::{condition_holds, Destination};
use crate::error::{GenerateError, Result};
use crate::glob;

const TEMPLATE_SUFFIXES: [&str; 2] = [".eta", ".tmpl"];

/// Output file name for a template: its basename without a template suffix.
pub fn output_name(template: &Path) -> String {
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    TEMPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or(name)
}

/// Render the matches of each map's `src` glob (relative to `search_dir`)
/// into its `dst` (relative to `base_dir`). Returns every written path.
pub fn render_templates(
    templates: &[FileMap],
    search_dir: &Path,
    base_dir: &Path,
    context: &Value,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for map in templates {
        let wrap = |source: GenerateError| GenerateError::Render {
            src: map.src.clone(),
            dst: map.dst.clone(),
            source: Box::new(source),
        };

        if !condition_holds(map, context).map_err(wrap)? {
            debug!("skipping template {}: condition not met", map.src);
            continue;
        }

        let dest = Destination::resolve(base_dir, &map.dst, context).map_err(wrap)?;
        let data = template_data(context, &dest, base_dir);
        let sources = glob::expand(search_dir, &map.src).map_err(wrap)?;
        if sources.is_empty() {
            warn!("template {} matched nothing under {}", map.src, search_dir.display());
        }

        for src in sources {
            let target = render_one(&src, &dest, &data).map_err(wrap)?;
            info!("rendered {} -> {}", src.display(), target.display());
            written.push(target);
        }
    }

    Ok(written)
}

fn render_one(src: &Path, dest: &Destination, data: &Value) -> Result<PathBuf> {
    let bytes = fs::read(src)?;
    let body = String::from_utf8(bytes).map_err(|_| GenerateError::NotUtf8 { path: src.to_path_buf() })?;
    let name = src.display().to_string();

    let mut env = environment();
    env.add_template(&name, &body)?;
    let rendered = env.get_template(&name)?.render(json!({ "context": data }))?;

    let target = dest.prepare(&output_name(src))?;
    fs::write(&target, rendered)?;
    Ok(target)
}

fn environment<'s>() -> Environment<'s> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_filter("hex", hex);
    env
}

fn hex(value: u64) -> String {
    format!("{value:#x}")
}

fn template_data(context: &Value, dest: &Destination, base_dir: &Path) -> Value {
    let relative = dest
        .path
        .strip_prefix(base_dir)
        .unwrap_or(&dest.path)
        .to_string_lossy()
        .replace('\\', "/");
    let relative = if dest.is_dir { format!("{relative}/") } else { relative };

    let mut data = match context {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    data.insert("relativeFilePath".into(), Value::String(relative));
    Value::Object(data)
}
