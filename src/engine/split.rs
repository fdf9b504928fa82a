/// Split a file name into (stem, extension) at the last `.`.
///
/// The extension keeps its dot. Leading dots never start an extension, so
/// `.gitignore` and `..foo` are all stem.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if file_name[..idx].chars().any(|c| c != '.') => {
            (&file_name[..idx], &file_name[idx..])
        }
        _ => (file_name, ""),
    }
}
