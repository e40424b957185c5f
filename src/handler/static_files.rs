//! Static file serving module
//!
//! Resolves request paths under the served root and answers with file
//! contents, a directory redirect, an index file, or a directory listing.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Files served in place of a listing, in order of preference
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve whatever the request path names under `root`
pub async fn serve_path(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    let translated = http::translate_path(root, ctx.path);

    if fs::metadata(&translated.fs_path)
        .await
        .is_ok_and(|m| m.is_dir())
    {
        return serve_directory(ctx, &translated.fs_path).await;
    }

    // A trailing slash promises a directory
    if translated.trailing_slash {
        return http::build_404_response("File not found", ctx.is_head);
    }

    serve_file(ctx, &translated.fs_path).await
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        // A leading `//` would make the location protocol-relative (another host)
        let path = ctx.path.trim_start_matches('/');
        let location = match ctx.query {
            Some(query) => format!("/{path}/?{query}"),
            None => format!("/{path}/"),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in INDEX_FILES {
        let index_path = dir.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::render_directory(dir, ctx.path).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Serve a single regular file, honoring `If-Modified-Since`
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let file = match load_file(file_path, ctx.is_head).await {
        Ok(Some(file)) => file,
        // Missing files and non-regular files are common (404), no need to log
        Ok(None) => return http::build_404_response("File not found", ctx.is_head),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                logger::log_warning(&format!(
                    "Failed to read file '{}': {e}",
                    file_path.display()
                ));
            }
            return http::build_404_response("File not found", ctx.is_head);
        }
    };

    if let Some(modified) = file.modified {
        if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
            return http::build_304_response();
        }
    }

    let last_modified = file.modified.map(cache::format_last_modified);
    http::build_file_response(
        file.content,
        file.len,
        mime::content_type_for(file_path),
        last_modified.as_deref(),
    )
}

/// File loaded for a response
struct LoadedFile {
    /// Empty for HEAD requests
    content: Bytes,
    len: u64,
    modified: Option<SystemTime>,
}

/// Load a regular file; `Ok(None)` when the path is not a regular file
async fn load_file(path: &Path, skip_content: bool) -> io::Result<Option<LoadedFile>> {
    let metadata = fs::metadata(path).await?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let content = if skip_content {
        Bytes::new()
    } else {
        Bytes::from(fs::read(path).await?)
    };

    // The file may have changed since stat; report what is actually sent
    let len = if skip_content {
        metadata.len()
    } else {
        content.len() as u64
    };

    Ok(Some(LoadedFile {
        content,
        len,
        modified: metadata.modified().ok(),
    }))
}
