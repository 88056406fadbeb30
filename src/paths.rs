/// Normalizes a path for the file-browsing and video routes.
///
/// Collapses runs of separators, guarantees a single leading `/` and strips
/// a trailing one unless the whole path is the root. Empty input maps to
/// the root path.
pub fn normalize_file_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        if normalized.len() > 1 {
            normalized.push('/');
        }
        normalized.push_str(segment);
    }

    normalized
}
