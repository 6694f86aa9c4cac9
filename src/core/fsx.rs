// src/core/fsx.rs
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8, WINDOWS_1254};

/// Last `n` lines of a text file, terminators kept. A missing file has no lines.
/// `n = 0` yields no lines, not the whole file.
pub fn read_tail(path: &Path, n: usize) -> io::Result<Vec<String>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let skip = lines.len().saturating_sub(n);
    Ok(lines[skip..].iter().map(|l| l.to_string()).collect())
}

/// Replace the component `up` levels above the last one with `new_name`.
///
/// `rename_path("a/b/c.txt", "x", 0)` is `a/b/x`, with `up = 1` it is
/// `a/x/c.txt`. `slash_only` turns every `\` into `/`.
pub fn rename_path(path: &Path, new_name: &str, up: usize, slash_only: bool) -> PathBuf {
    let mut head = path.to_path_buf();
    let mut tail: Vec<OsString> = Vec::with_capacity(up);
    for _ in 0..up {
        if let Some(name) = head.file_name() {
            tail.push(name.to_os_string());
        }
        head.pop();
    }

    head.pop();
    head.push(new_name);
    for name in tail.iter().rev() {
        head.push(name);
    }

    if slash_only {
        return PathBuf::from(head.to_string_lossy().replace('\\', "/"));
    }
    head
}

/// Rewrite `path` in `target` if it is stored in some other encoding.
///
/// `Ok(false)` when `path` is not a file. Valid UTF-8 counts as UTF-8 without
/// guessing. A Windows-1254 guess is taken to be Shift_JIS, the usual
/// misdetection for short Japanese text.
pub fn convert_file_encoding(path: &Path, target: &'static Encoding) -> io::Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let bytes = fs::read(path)?;

    let found = detect_encoding(&bytes);
    if found == target {
        return Ok(true);
    }

    let (text, _, had_errors) = found.decode(&bytes);
    if had_errors {
        logd!("{}: lossy decode as {}", path.display(), found.name());
    }
    let (out, _, _) = target.encode(&text);
    fs::write(path, out)?;
    logf!("Converted {} from {} to {}", path.display(), found.name(), target.name());
    Ok(true)
}

pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    match detector.guess(None, true) {
        e if e == WINDOWS_1254 => SHIFT_JIS,
        e => e,
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
