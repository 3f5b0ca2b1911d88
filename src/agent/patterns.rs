//! `file_patterns` matching.
//!
//! A pattern containing `*` is a wildcard: `*` matches any run of
//! characters and the whole pattern must match either the file name or the
//! full path. Any other pattern matches when it occurs anywhere in the path.

use regex::Regex;
use std::path::Path;

/// Test one pattern against a path. Paths are compared with `/` separators.
pub fn matches(pattern: &str, path: &Path) -> bool {
    let path = path.to_string_lossy().replace('\\', "/");
    if pattern.contains('*') {
        let Some(re) = wildcard_regex(pattern) else {
            return false;
        };
        let file_name = path.rsplit('/').next().unwrap_or_default();
        re.is_match(file_name) || re.is_match(&path)
    } else {
        path.contains(pattern)
    }
}

fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).ok()
}
