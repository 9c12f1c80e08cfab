use std::path::{Path, PathBuf};

pub const DEFAULT_OUT_DIR: &str = "./out";
pub const DEFAULT_TIMEOUT_MS: u64 = 180_000;

// characters that are replaced globally, after the leading "://" is handled
const DISALLOWED: [char; 8] = ['.', '/', '?', '*', '"', '<', '>', '|'];

/// Derives a filesystem-safe base name from a URL.
///
/// The first literal `://` is collapsed into a single underscore, then every
/// occurrence of `.` `/` `?` `*` `"` `<` `>` `|` becomes an underscore. A
/// colon that is not part of the first `://` (ports, later scheme
/// separators) is left alone. Distinct URLs can collide after substitution;
/// callers accept that the later file overwrites the earlier one.
pub fn name_from_url(url: &str) -> String {
    url.replacen("://", "_", 1)
        .chars()
        .map(|c| if DISALLOWED.contains(&c) { '_' } else { c })
        .collect()
}

pub fn pdf_save_path(out_dir: &Path, url: &str) -> PathBuf {
    out_dir.join(format!("{}.pdf", name_from_url(url)))
}
