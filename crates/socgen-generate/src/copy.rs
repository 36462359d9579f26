//! Verbatim file copies.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;
use socgen_model::FileMap;

use crate::dest::{condition_holds, Destination};
use crate::error::{GenerateError, Result};
use crate::glob;

/// Copy the matches of each map's `src` glob (relative to `plugin_dir`) to
/// its `dst` (relative to `base_dir`).
///
/// Maps are processed in order; matches of one map in sorted order. Returns
/// every written path.
pub fn copy_files(files: &[FileMap], plugin_dir: &Path, base_dir: &Path, context: &Value) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for map in files {
        let wrap = |source: GenerateError| GenerateError::Copy {
            src: map.src.clone(),
            dst: map.dst.clone(),
            source: Box::new(source),
        };

        if !condition_holds(map, context).map_err(wrap)? {
            debug!("skipping {} -> {}: condition not met", map.src, map.dst);
            continue;
        }

        let dest = Destination::resolve(base_dir, &map.dst, context).map_err(wrap)?;
        let sources = glob::expand(plugin_dir, &map.src).map_err(wrap)?;
        if sources.is_empty() {
            debug!("{} matched no files under {}", map.src, plugin_dir.display());
        }

        for src in sources {
            let file_name = src
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target = dest.prepare(&file_name).map_err(wrap)?;
            fs::copy(&src, &target).map_err(|e| wrap(e.into()))?;
            info!("copied {} -> {}", src.display(), target.display());
            written.push(target);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(src: &str, dst: &str) -> FileMap {
        FileMap {
            src: src.into(),
            dst: dst.into(),
            condition: None,
        }
    }

    fn plugin_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, body) in [
            ("files/main.c", "int main(void) { return 0; }\n"),
            ("files/board.h", "#pragma once\n"),
            ("files/prj.conf", "CONFIG_GPIO=y\n"),
        ] {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        dir
    }

    #[test]
    fn glob_into_directory() {
        let plugin = plugin_tree();
        let out = tempfile::tempdir().unwrap();
        let context = json!({ "name": "blinky" });

        let written = copy_files(&[map("files/*.{c,h}", "${context.name}/src/")], plugin.path(), out.path(), &context)
            .unwrap();

        assert_eq!(
            written,
            [out.path().join("blinky/src/board.h"), out.path().join("blinky/src/main.c")]
        );
        assert_eq!(
            fs::read_to_string(out.path().join("blinky/src/main.c")).unwrap(),
            "int main(void) { return 0; }\n"
        );
    }

    #[test]
    fn single_file_renamed() {
        let plugin = plugin_tree();
        let out = tempfile::tempdir().unwrap();

        let written = copy_files(&[map("files/prj.conf", "app/zephyr.conf")], plugin.path(), out.path(), &json!({}))
            .unwrap();

        assert_eq!(written, [out.path().join("app/zephyr.conf")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "CONFIG_GPIO=y\n");
    }

    #[test]
    fn false_condition_skips() {
        let plugin = plugin_tree();
        let out = tempfile::tempdir().unwrap();
        let mut conditional = map("files/*.c", "src/");
        conditional.condition = Some("${context.rtos === 'freertos'}".into());

        let written = copy_files(&[conditional], plugin.path(), out.path(), &json!({ "rtos": "zephyr" })).unwrap();
        assert!(written.is_empty());
        assert!(!out.path().join("src").exists());
    }

    #[test]
    fn failure_names_src_and_dst() {
        let plugin = plugin_tree();
        let out = tempfile::tempdir().unwrap();

        let err = copy_files(&[map("files/*.c", "${context.}/")], plugin.path(), out.path(), &json!({}))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Copy { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Failed to copy from files/*.c to ${context.}/"), "{message}");
    }
}
