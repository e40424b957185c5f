//! Request path translation module
//!
//! Maps a request target onto the served root. The result can never name a
//! location outside the root: `..` is resolved lexically before joining and
//! any segment that is not a plain file name is dropped.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Request target translated to a filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Location under the served root
    pub fs_path: PathBuf,
    /// Whether the request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a request target (`/a/b.txt?q#frag`) to a path under `root`
///
/// # Examples
/// ```
/// use nocache_server::http::path::translate_path;
/// use std::path::Path;
///
/// let t = translate_path(Path::new("/srv"), "/docs/../a%20b.txt?x=1");
/// assert_eq!(t.fs_path, Path::new("/srv/a b.txt"));
/// assert!(!t.trailing_slash);
/// ```
pub fn translate_path(root: &Path, target: &str) -> TranslatedPath {
    let path = strip_query_and_fragment(target);
    let trailing_slash = path.trim_end().ends_with('/');

    let decoded = urlencoding::decode_binary(path.as_bytes());

    let mut fs_path = root.to_path_buf();
    for segment in normalize_segments(&decoded) {
        let segment = segment_to_os(segment);
        if is_plain_name(&segment) {
            fs_path.push(segment);
        }
    }

    TranslatedPath {
        fs_path,
        trailing_slash,
    }
}

/// Decode a request path for display (directory listing titles)
pub fn decode_for_display(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

fn strip_query_and_fragment(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// Resolve `.`, `..` and empty segments lexically; `..` stops at the root
fn normalize_segments(path: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    for segment in path.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

/// Decoded bytes name the file as-is, so non-UTF-8 names stay reachable
#[cfg(unix)]
fn segment_to_os(segment: &[u8]) -> Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(OsStr::from_bytes(segment))
}

#[cfg(not(unix))]
fn segment_to_os(segment: &[u8]) -> Cow<'_, OsStr> {
    match String::from_utf8_lossy(segment) {
        Cow::Borrowed(s) => Cow::Borrowed(OsStr::new(s)),
        Cow::Owned(s) => Cow::Owned(s.into()),
    }
}

/// A segment joins as exactly one path component (no separators, prefixes or roots)
fn is_plain_name(segment: &OsStr) -> bool {
    Path::new(segment).file_name() == Some(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/www")
    }

    #[test]
    fn test_root_path() {
        let t = translate_path(&root(), "/");
        assert_eq!(t.fs_path, root());
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_query_and_fragment_removed() {
        let t = translate_path(&root(), "/a/b.txt?x=1#top");
        assert_eq!(t.fs_path, root().join("a").join("b.txt"));
        assert!(!t.trailing_slash);

        let t = translate_path(&root(), "/dir/#frag?x");
        assert_eq!(t.fs_path, root().join("dir"));
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_percent_decoding() {
        let t = translate_path(&root(), "/my%20file.txt");
        assert_eq!(t.fs_path, root().join("my file.txt"));
    }

    #[test]
    fn test_parent_segments_stay_inside_root() {
        let t = translate_path(&root(), "/../../etc/passwd");
        assert_eq!(t.fs_path, root().join("etc").join("passwd"));

        let t = translate_path(&root(), "/a/%2e%2e/%2E%2E/%2e%2e/b");
        assert_eq!(t.fs_path, root().join("b"));

        let t = translate_path(&root(), "/a/b/../c");
        assert_eq!(t.fs_path, root().join("a").join("c"));
    }

    #[test]
    fn test_encoded_slash_splits_segments() {
        let t = translate_path(&root(), "/..%2f..%2fetc");
        assert_eq!(t.fs_path, root().join("etc"));
    }

    #[test]
    fn test_duplicate_slashes_and_dots() {
        let t = translate_path(&root(), "//a/./b//");
        assert_eq!(t.fs_path, root().join("a").join("b"));
        assert!(t.trailing_slash);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_segment_kept_as_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let t = translate_path(&root(), "/caf%E9.txt");
        assert_eq!(t.fs_path, root().join(OsStr::from_bytes(b"caf\xe9.txt")));
    }

    #[test]
    fn test_decode_for_display() {
        assert_eq!(decode_for_display("/a%20b/"), "/a b/");
        assert_eq!(decode_for_display("/plain/"), "/plain/");
    }
}
