//! Source globs of feature file maps.
//!
//! Patterns use `/` as separator and support `*` (within one path segment),
//! `**` (any number of segments), `?`, `[...]` classes and `{a,b}`
//! alternatives. Leading literal segments are resolved directly so only the
//! wildcard part of the tree is walked.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{GenerateError, Result};

fn has_magic(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Translate a glob into an anchored regular expression over `/`-separated
/// relative paths.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    let mut in_braces = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                if at_segment_start && chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => match chars[i + 1..].iter().position(|&ch| ch == ']') {
                Some(len) => {
                    let class: String = chars[i + 1..i + 1 + len].iter().collect();
                    let class = class.strip_prefix('!').map(|c| format!("^{c}")).unwrap_or(class);
                    out.push('[');
                    out.push_str(&class.replace('\\', "\\\\"));
                    out.push(']');
                    i += len + 2;
                    continue;
                }
                None => out.push_str("\\["),
            },
            '{' => {
                in_braces += 1;
                out.push_str("(?:");
            }
            '}' if in_braces > 0 => {
                in_braces -= 1;
                out.push(')');
            }
            ',' if in_braces > 0 => out.push('|'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Files under `base` matching `pattern`, sorted.
///
/// A pattern without wildcards yields the one file it names, if it exists.
pub fn expand(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = pattern.replace('\\', "/");
    let pattern = pattern.trim_start_matches("./");
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();

    let literal = segments.iter().take_while(|s| !has_magic(s)).count();
    let mut root = base.to_path_buf();
    for segment in &segments[..literal] {
        root.push(segment);
    }

    if literal == segments.len() {
        return Ok(if root.is_file() { vec![root] } else { Vec::new() });
    }
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let rest = segments[literal..].join("/");
    let matcher = Regex::new(&glob_to_regex(&rest)).map_err(|source| GenerateError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if matcher.is_match(&relative) {
            matches.push(entry.into_path());
        }
    }
    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn matches(pattern: &str, path: &str) -> bool {
        Regex::new(&glob_to_regex(pattern)).unwrap().is_match(path)
    }

    #[test]
    fn single_star_stays_in_segment() {
        assert!(matches("*.c", "main.c"));
        assert!(!matches("*.c", "src/main.c"));
        assert!(matches("src/*.h", "src/board.h"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(matches("**/*.c", "main.c"));
        assert!(matches("**/*.c", "a/b/main.c"));
        assert!(matches("src/**", "src/a/b.txt"));
        assert!(!matches("**/*.c", "a/b/main.h"));
    }

    #[test]
    fn question_classes_and_braces() {
        assert!(matches("file?.txt", "file1.txt"));
        assert!(!matches("file?.txt", "file12.txt"));
        assert!(matches("[ab].c", "b.c"));
        assert!(!matches("[!ab].c", "a.c"));
        assert!(matches("*.{c,h}", "x.h"));
        assert!(!matches("*.{c,h}", "x.s"));
        assert!(matches("a+b.c", "a+b.c"));
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for path in ["files/b.c", "files/a.c", "files/sub/c.c", "files/sub/d.h", "files/readme.md"] {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        dir
    }

    fn names(base: &Path, found: &[PathBuf]) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn expand_is_sorted() {
        let dir = tree();
        let found = expand(dir.path(), "files/*.c").unwrap();
        assert_eq!(names(dir.path(), &found), ["files/a.c", "files/b.c"]);

        let found = expand(dir.path(), "files/**/*.c").unwrap();
        assert_eq!(names(dir.path(), &found), ["files/a.c", "files/b.c", "files/sub/c.c"]);
    }

    #[test]
    fn literal_pattern_names_one_file() {
        let dir = tree();
        let found = expand(dir.path(), "./files/readme.md").unwrap();
        assert_eq!(names(dir.path(), &found), ["files/readme.md"]);
        assert!(expand(dir.path(), "files/missing.md").unwrap().is_empty());
        assert!(expand(dir.path(), "files/sub").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tree();
        assert!(expand(dir.path(), "nothing/**/*").unwrap().is_empty());
    }
}
