//! HTTP server for the plot browsing UI
//!
//! `plotshelf ./static/plots` → starts server, opens browser, shows the
//! folder listing. Three routes:
//!
//! - `GET /?path=<dir>` — directory listing
//! - `GET /plot/<file>` — raw file bytes
//! - `GET /plot_view/<file>` — chart page with prev/next navigation

use crate::list::parent_of;
use crate::page::{self, ViewPage};
use crate::resolve::PlotRoot;
use crate::{chart, list, nav};
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Deserialize, Debug, Default)]
struct ListQuery {
    #[serde(default)]
    path: String,
}

/// Server options beyond the address.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Launch the system browser at the listing page on startup.
    pub open_browser: bool,
    /// Suppress the banner and per-request log lines.
    pub quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { open_browser: true, quiet: false }
    }
}

/// Start the server and block handling requests.
pub fn start(port: u16, path: PathBuf, options: Options) -> io::Result<()> {
    let root = PlotRoot::open(&path)?;

    let addr = format!("127.0.0.1:{}", port);
    let server =
        Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    if !options.quiet {
        eprintln!("\n\x1b[1;32m📊 Plotshelf\x1b[0m");
        eprintln!("   {}", url);
        eprintln!("   Serving: {}\n", root.path().display());
    }

    if options.open_browser {
        let _ = open::that(&url);
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &root, options.quiet) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, root: &PlotRoot, quiet: bool) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let query = url.split('?').nth(1).unwrap_or("");
    let method = request.method().clone();

    if !quiet {
        eprintln!("→ {} {}", method, path);
    }

    match (&method, path) {
        // Directory listing
        (&Method::Get, "/") => {
            let params: ListQuery = serde_urlencoded::from_str(query).unwrap_or_default();
            match list::list(root, &params.path) {
                Ok(listing) => {
                    let mut body = Vec::new();
                    page::write_listing(&mut body, &listing)?;
                    request.respond(html_response(body, 200))
                }
                Err(_) => respond_not_found(request),
            }
        }

        // Raw file bytes
        (&Method::Get, p) if p.starts_with("/plot/") => {
            let rel = percent_decode(&p["/plot/".len()..]);
            match root.resolve_file(&rel) {
                Ok(abs) => {
                    let file = File::open(&abs)?;
                    let response =
                        Response::from_file(file).with_header(content_type_header(&rel));
                    request.respond(response)
                }
                Err(_) => respond_not_found(request),
            }
        }

        // Chart page with navigation
        (&Method::Get, p) if p.starts_with("/plot_view/") => {
            let rel = percent_decode(&p["/plot_view/".len()..]);
            respond_plot_view(request, root, &rel)
        }

        // 404
        _ => respond_not_found(request),
    }
}

fn respond_plot_view(request: Request, root: &PlotRoot, rel: &str) -> io::Result<()> {
    let rel = rel.trim_matches('/');
    if root.resolve_file(rel).is_err() {
        return respond_not_found(request);
    }

    let parent = parent_of(rel).unwrap_or_default();
    let current = Path::new(rel)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let siblings = nav::sibling_neighbors(root, &parent, &current);
    let cross = nav::cross_folder_neighbors(root, &parent, &current);

    // JSON descriptions are rendered on demand; the served document is
    // the rendered file while navigation keeps tracking the original.
    let filename = if rel.ends_with(".json") {
        match chart::render_json_chart(root, rel) {
            Ok(rendered) => rendered,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                let mut body = Vec::new();
                page::write_error(&mut body, "Malformed chart", &e.to_string())?;
                return request.respond(html_response(body, 500));
            }
            Err(_) => return respond_not_found(request),
        }
    } else {
        rel.to_string()
    };

    let view = ViewPage { filename, parent, siblings, cross };
    let mut body = Vec::new();
    page::write_view(&mut body, &view)?;
    request.respond(html_response(body, 200))
}

fn respond_not_found(request: Request) -> io::Result<()> {
    let mut body = Vec::new();
    page::write_error(&mut body, "Not found", "Nothing lives at this path.")?;
    request.respond(html_response(body, 404))
}

fn html_response(body: Vec<u8>, status: u16) -> Response<io::Cursor<Vec<u8>>> {
    Response::from_data(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]).unwrap(),
        )
}

fn content_type_header(path: &str) -> Header {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let value: &[u8] = match ext.as_str() {
        "html" | "htm" => b"text/html; charset=utf-8",
        "json" => b"application/json",
        _ => b"application/octet-stream",
    };
    Header::from_bytes(&b"Content-Type"[..], value).unwrap()
}

/// Decode %XX escapes in a URL path segment. Invalid escapes pass
/// through untouched.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16));
            let lo = bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16));
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("run%201/snap.json"), "run 1/snap.json");
        assert_eq!(percent_decode("plain/path.html"), "plain/path.html");
        assert_eq!(percent_decode("bad%2"), "bad%2");
        assert_eq!(percent_decode("bad%zz"), "bad%zz");
        assert_eq!(percent_decode("%2F"), "/");
    }

    #[test]
    fn test_list_query_defaults_to_root() {
        let q: ListQuery = serde_urlencoded::from_str("").unwrap_or_default();
        assert_eq!(q.path, "");

        let q: ListQuery = serde_urlencoded::from_str("path=batch%2Frun1").unwrap_or_default();
        assert_eq!(q.path, "batch/run1");
    }

    #[test]
    fn test_content_type_by_extension() {
        let header = content_type_header("a/b/chart.html");
        assert_eq!(header.value.as_str(), "text/html; charset=utf-8");
        let header = content_type_header("a/b/chart.json");
        assert_eq!(header.value.as_str(), "application/json");
        let header = content_type_header("mystery.bin");
        assert_eq!(header.value.as_str(), "application/octet-stream");
    }
}
