// src/utils.rs
pub const FALLBACK_FILE_STEM: &str = "Resume";

/// File name for an exported artifact: `<name>.<ext>`, or `Resume.<ext>` for a blank name.
/// Only characters that break a path are replaced, spaces are kept.
pub fn export_filename(name: &str, extension: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        format!("{}.{}", FALLBACK_FILE_STEM, extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// File name for bytes named by someone else, e.g. a server reply.
/// Directory parts are dropped and the extension is forced to `extension`, so
/// the result always names a file directly inside the target directory.
pub fn remote_filename(name: &str, extension: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let stem = match base.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(extension) => stem,
        _ => base,
    };
    export_filename(stem, extension)
}
