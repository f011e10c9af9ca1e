//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A small OEIS stripped file with correct leading terms.
pub const STRIPPED_SAMPLE: &str = "\
# OEIS stripped sample for tests
A000040 ,2,3,5,7,11,13,17,19,23,29,31,37,41,43,47,53,59,61,67,71,
A000290 ,0,1,4,9,16,25,36,49,64,81,100,121,144,169,196,225,
A013928 ,0,1,2,3,3,4,5,6,6,6,7,8,8,9,10,11,11,12,12,13,13,
";

/// Limits that keep infinite-vs-infinite checks short.
pub const FAST_CONFIG: &str = "\
[limits.default]
max_index = 100
";

/// Write `content` to a fresh temporary file. The file lives as long as the
/// returned handle.
pub fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
