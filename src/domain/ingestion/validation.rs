//! Validation helpers for ingestion

/// File extensions accepted for upload
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".pdf", ".docx", ".txt", ".doc"];

/// Lowercased extension including the leading dot, or empty when there is none
pub fn file_extension(filename: &str) -> String {
    let (_, ext) = split_file_name(filename);
    ext.to_lowercase()
}

/// Split a filename into stem and extension (with the dot)
///
/// A leading dot (hidden file) is part of the stem, not an extension.
pub fn split_file_name(filename: &str) -> (&str, &str) {
    let base_start = filename.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let base = &filename[base_start..];

    match base.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(base_start + pos),
        _ => (filename, ""),
    }
}

/// Check whether the file extension is on the whitelist
pub fn is_supported_format(filename: &str) -> bool {
    let ext = file_extension(filename);
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// Failure reason reported for rejected uploads
pub fn unsupported_format_message() -> String {
    format!(
        "Unsupported file format. Supported: [{}]",
        SUPPORTED_EXTENSIONS.join(", ")
    )
}
