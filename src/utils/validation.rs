use unicode_normalization::UnicodeNormalization;

/// Device names Windows refuses as plain filenames
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "con", "aux", "com1", "com2", "com3", "com4", "lpt1", "lpt2", "lpt3", "prn", "nul",
];

/// Sanitizes a client-supplied filename into a flat, ASCII-only name.
///
/// The input is lowercased and transliterated (NFKD, non-ASCII dropped).
/// Path separators and whitespace runs become a single `_`, every character
/// outside `[a-z0-9_.-]` is removed, and leading `.`, `_`, `-` as well as
/// trailing `.`, `_` are stripped. The result never contains a separator and
/// never starts with a dot, so it cannot name a parent directory.
///
/// May return an empty string when nothing usable is left; callers decide
/// how to treat that.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .to_lowercase()
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = filtered
        .trim_start_matches(['.', '_', '-'])
        .trim_end_matches(['.', '_']);

    if trimmed.is_empty() {
        return String::new();
    }

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if WINDOWS_DEVICE_NAMES.contains(&stem) {
        return format!("_{}", trimmed);
    }

    trimmed.to_string()
}

/// Splits a filename at its last dot into `(base, extension)`, keeping the dot
/// on the extension. A leading dot does not start an extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}
