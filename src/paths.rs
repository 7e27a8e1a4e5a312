use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Clean up a path typed or pasted at the prompt: surrounding whitespace
/// and any quotation marks wrapped around it are removed.
pub fn sanitize_path(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// `<dir>/<stem><suffix>.csv` next to the input file
pub fn derive_output_path<P: AsRef<Path>>(input: P, suffix: &str) -> PathBuf {
    let input = input.as_ref();
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(suffix);
    name.push(".csv");
    input.with_file_name(name)
}
