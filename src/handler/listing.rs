//! Directory listing module
//!
//! Generates the HTML page served for directories without an index file.

use crate::http::path::decode_for_display;
use crate::http::response::escape_html;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Kind of a listed entry, which decides its label and link suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symbolic link; `to_dir` when it resolves to a directory
    Symlink { to_dir: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Display name; undecodable bytes are replaced
    pub name: String,
    /// Percent-encoded from the raw name bytes
    encoded: String,
    pub kind: EntryKind,
}

impl ListingEntry {
    pub fn new(name: &OsStr, kind: EntryKind) -> Self {
        Self {
            name: name.to_string_lossy().into_owned(),
            encoded: encode_name(name),
            kind,
        }
    }

    /// Text shown for the entry: `name/` for directories, `name@` for links
    fn label(&self) -> String {
        match self.kind {
            EntryKind::File => self.name.clone(),
            EntryKind::Dir => format!("{}/", self.name),
            EntryKind::Symlink { .. } => format!("{}@", self.name),
        }
    }

    /// Percent-encoded link target, with `/` for anything that is a directory
    fn href(&self) -> String {
        match self.kind {
            EntryKind::Dir | EntryKind::Symlink { to_dir: true } => format!("{}/", self.encoded),
            _ => self.encoded.clone(),
        }
    }
}

#[cfg(unix)]
fn encode_name(name: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    urlencoding::encode_binary(name.as_bytes()).into_owned()
}

#[cfg(not(unix))]
fn encode_name(name: &OsStr) -> String {
    urlencoding::encode(&name.to_string_lossy()).into_owned()
}

/// Read `dir` and render its listing for the request path it was reached by
pub async fn render_directory(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = read_entries(dir).await?;
    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(render_listing(&decode_for_display(request_path), &entries))
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let kind = match entry.file_type().await {
            Ok(t) if t.is_symlink() => EntryKind::Symlink {
                to_dir: fs::metadata(entry.path())
                    .await
                    .is_ok_and(|m| m.is_dir()),
            },
            Ok(t) if t.is_dir() => EntryKind::Dir,
            _ => EntryKind::File,
        };
        entries.push(ListingEntry::new(&entry.file_name(), kind));
    }

    Ok(entries)
}

/// Render a listing page; `entries` are shown in the given order
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>\n<hr>\n<ul>");
    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&entry.href()),
            escape_html(&entry.label())
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_listing() {
        let entries = vec![
            ListingEntry::new(OsStr::new("a b.txt"), EntryKind::File),
            ListingEntry::new(OsStr::new("docs"), EntryKind::Dir),
            ListingEntry::new(OsStr::new("latest"), EntryKind::Symlink { to_dir: true }),
        ];
        let html = render_listing("/files/", &entries);
        assert!(html.contains("<title>Directory listing for /files/</title>"));
        assert!(html.contains("<h1>Directory listing for /files/</h1>"));
        assert!(html.contains(r#"<li><a href="a%20b.txt">a b.txt</a></li>"#));
        assert!(html.contains(r#"<li><a href="docs/">docs/</a></li>"#));
        assert!(html.contains(r#"<li><a href="latest/">latest@</a></li>"#));
    }

    #[test]
    fn test_render_listing_escapes_names() {
        let entries = vec![ListingEntry::new(OsStr::new("<script>"), EntryKind::File)];
        let html = render_listing("/<x>/", &entries);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains("&lt;script&gt;</a>"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_render_directory_sorted_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beta.txt"), "").unwrap();
        std::fs::write(dir.path().join("Alpha.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("gamma")).unwrap();

        let html = render_directory(dir.path(), "/sub%20dir/").await.unwrap();
        assert!(html.contains("Directory listing for /sub dir/"));

        let alpha = html.find("Alpha.txt").unwrap();
        let beta = html.find("beta.txt").unwrap();
        let gamma = html.find("gamma/").unwrap();
        assert!(alpha < beta && beta < gamma);
    }

    // Linux filesystems accept arbitrary bytes in names
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_name_links_to_raw_bytes() {
        use crate::http::translate_path;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(name), "x").unwrap();

        let html = render_directory(dir.path(), "/").await.unwrap();
        assert!(html.contains("<a href=\"caf%E9.txt\">caf\u{FFFD}.txt</a>"));

        let t = translate_path(dir.path(), "/caf%E9.txt");
        assert_eq!(std::fs::read(t.fs_path).unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_render_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_directory(&dir.path().join("missing"), "/missing/")
            .await
            .is_err());
    }
}
