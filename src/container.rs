//! Container field helpers

/// Extract the filename from a remote container URL
///
/// Drops any query string, then returns the final path segment. The API
/// does not always include a file extension for non media files, so no
/// extension matching is attempted.
pub fn filename_from_url(url: &str) -> &str {
    let path = match url.split_once('?') {
        Some((path, _)) => path,
        None => url,
    };
    path.rsplit('/').next().unwrap_or(path)
}
