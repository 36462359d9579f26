//! Destination resolution shared by the copy and render services.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use socgen_expr::eval_nested_template_literals;
use socgen_model::FileMap;

use crate::error::Result;

/// Where the matches of one file map are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    /// Matches keep their own file names inside `path`.
    pub is_dir: bool,
}

impl Destination {
    /// Interpolate `dst` against `context` and anchor it at `base_dir`.
    pub fn resolve(base_dir: &Path, dst: &str, context: &Value) -> Result<Self> {
        let dst = eval_nested_template_literals(dst, context)?;
        Ok(Self {
            is_dir: dst.ends_with('/') || dst.ends_with('\\'),
            path: base_dir.join(dst.trim_end_matches(['/', '\\'])),
        })
    }

    /// Path for a file named `file_name`, with its parent directory created.
    pub fn prepare(&self, file_name: &str) -> Result<PathBuf> {
        let target = if self.is_dir {
            fs::create_dir_all(&self.path)?;
            self.path.join(file_name)
        } else {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            self.path.clone()
        };
        Ok(target)
    }
}

/// Whether a map applies: no condition, or one that renders `"true"`.
pub fn condition_holds(map: &FileMap, context: &Value) -> Result<bool> {
    match &map.condition {
        Some(condition) => Ok(eval_nested_template_literals(condition, context)? == "true"),
        None => Ok(true),
    }
}
