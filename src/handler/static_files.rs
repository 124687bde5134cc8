//! Static file serving module
//!
//! Clean-URL rewriting, path resolution under the site root, and static
//! response building.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// The admin page is always reachable without its extension, whether or not
/// the file exists yet.
const ADMIN_PATH: &str = "/admin";

/// Serve a static file for a GET/HEAD request
pub async fn serve(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let site = &state.config.site;
    let translated = translate_clean_url(&site.root, ctx.path);

    match load_from_root(&site.root, &translated, &site.index_files).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_static_file_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
                &state.config.http.server_name,
            )
        }
        None => http::build_404_response(),
    }
}

/// Clean-URL rewriting applied before static resolution.
///
/// `/admin` maps to `/admin.html` unconditionally. Any other extensionless
/// path that does not end in a slash maps to `<path>.html` when that file
/// exists under the site root; otherwise the path is left unchanged.
pub fn translate_clean_url(root: &str, path: &str) -> String {
    if path == ADMIN_PATH {
        return format!("{ADMIN_PATH}.html");
    }

    let basename = path.rsplit('/').next().unwrap_or("");
    if !path.ends_with('/') && !basename.contains('.') {
        let candidate = format!("{}.html", path.trim_start_matches('/'));
        if Path::new(root).join(&candidate).is_file() {
            return format!("/{candidate}");
        }
    }

    path.to_string()
}

/// Load a file from the site root with index file support
pub async fn load_from_root(
    root: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let mut file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    // Directory paths fall back to index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` revalidation
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    // Full content even for HEAD; the builder empties the body while keeping
    // the true Content-Length
    http::response::build_cached_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        is_head,
        server_name,
    )
}
