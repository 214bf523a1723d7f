//! Server-rendered HTML pages for the browsing UI

use crate::list::{EntryKind, Listing};
use crate::nav::Neighbors;
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::time::SystemTime;

/// Everything the chart-view page needs: the (possibly substituted)
/// served filename plus the four navigation targets.
#[derive(Debug, Clone)]
pub struct ViewPage {
    /// Root-relative path of the document shown in the frame.
    pub filename: String,
    /// Folder holding the originally requested file.
    pub parent: String,
    /// Same-folder chronological neighbors.
    pub siblings: Neighbors,
    /// Same-name neighbors across sibling run folders.
    pub cross: Neighbors,
}

const STYLE: &str = r#"
        :root {
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }
        .container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
        .header {
            display: flex;
            align-items: baseline;
            gap: 1rem;
            margin-bottom: 1.5rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }
        .logo { font-size: 1.5rem; font-weight: 800; color: var(--accent); }
        .crumb { color: var(--dim); font-size: 0.95rem; }
        a { color: var(--accent); text-decoration: none; }
        a:hover { text-decoration: underline; }
        .entries { list-style: none; }
        .entries li {
            display: flex;
            align-items: center;
            gap: 0.75rem;
            padding: 0.5rem 0.75rem;
            border-bottom: 1px solid var(--border);
        }
        .badge {
            font-size: 0.7rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
            color: var(--dim);
            width: 3.5rem;
        }
        .time { margin-left: auto; color: var(--dim); font-size: 0.85rem; }
        .nav {
            display: flex;
            gap: 1rem;
            margin: 1rem 0;
            flex-wrap: wrap;
        }
        .nav span.absent { color: var(--dim); }
        .frame {
            width: 100%;
            height: 75vh;
            border: 1px solid var(--border);
            border-radius: 12px;
            background: #fff;
        }
        .error {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }
        .error h2 { color: #f85149; margin-bottom: 0.5rem; }
"#;

/// Escape text for embedding in HTML element content or attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a root-relative path for use inside a URL, keeping
/// slashes so the path structure survives.
pub fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'~' | b'/' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn format_time(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_head<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <span class="logo"><a href="/">plotshelf</a></span>
"#,
        title = escape(title),
        style = STYLE,
    )
}

fn write_foot<W: Write>(writer: &mut W) -> io::Result<()> {
    write!(writer, "    </div>\n</body>\n</html>\n")
}

/// Render the directory listing page.
pub fn write_listing<W: Write>(writer: &mut W, listing: &Listing) -> io::Result<()> {
    let title = if listing.current.is_empty() {
        "plotshelf".to_string()
    } else {
        format!("plotshelf — {}", listing.current)
    };
    write_head(writer, &title)?;
    writeln!(
        writer,
        r#"            <span class="crumb">/{}</span>"#,
        escape(&listing.current)
    )?;
    writeln!(writer, "        </div>")?;

    writeln!(writer, r#"        <ul class="entries">"#)?;
    if let Some(parent) = &listing.parent {
        writeln!(
            writer,
            r#"            <li><span class="badge">up</span><a href="/?path={}">..</a></li>"#,
            encode_path(parent)
        )?;
    }
    for entry in &listing.entries {
        let (badge, href) = match entry.kind {
            EntryKind::Folder => ("folder", format!("/?path={}", encode_path(&entry.path))),
            EntryKind::File => ("file", format!("/plot_view/{}", encode_path(&entry.path))),
        };
        writeln!(
            writer,
            r#"            <li><span class="badge">{}</span><a href="{}">{}</a><span class="time">{}</span></li>"#,
            badge,
            href,
            escape(&entry.name),
            format_time(entry.time)
        )?;
    }
    writeln!(writer, "        </ul>")?;
    write_foot(writer)
}

fn write_nav_link<W: Write>(writer: &mut W, label: &str, target: &Option<String>) -> io::Result<()> {
    match target {
        Some(path) => writeln!(
            writer,
            r#"            <a href="/plot_view/{}">{}</a>"#,
            encode_path(path),
            escape(label)
        ),
        None => writeln!(
            writer,
            r#"            <span class="absent">{}</span>"#,
            escape(label)
        ),
    }
}

/// Render the chart-view page: the served document in a frame plus the
/// four navigation links.
pub fn write_view<W: Write>(writer: &mut W, view: &ViewPage) -> io::Result<()> {
    write_head(writer, &format!("plotshelf — {}", view.filename))?;
    writeln!(
        writer,
        r#"            <span class="crumb"><a href="/?path={}">/{}</a></span>"#,
        encode_path(&view.parent),
        escape(&view.parent)
    )?;
    writeln!(writer, "        </div>")?;

    writeln!(writer, r#"        <div class="nav">"#)?;
    write_nav_link(writer, "← previous in folder", &view.siblings.prev)?;
    write_nav_link(writer, "next in folder →", &view.siblings.next)?;
    write_nav_link(writer, "← previous run", &view.cross.prev)?;
    write_nav_link(writer, "next run →", &view.cross.next)?;
    writeln!(writer, "        </div>")?;

    writeln!(
        writer,
        r#"        <iframe class="frame" src="/plot/{}"></iframe>"#,
        encode_path(&view.filename)
    )?;
    write_foot(writer)
}

/// Render a readable error page (used for malformed chart descriptions
/// instead of a bare server fault).
pub fn write_error<W: Write>(writer: &mut W, title: &str, message: &str) -> io::Result<()> {
    write_head(writer, title)?;
    writeln!(writer, "        </div>")?;
    writeln!(
        writer,
        r#"        <div class="error">
            <h2>{}</h2>
            <p>{}</p>
        </div>"#,
        escape(title),
        escape(message)
    )?;
    write_foot(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::Entry;
    use std::time::UNIX_EPOCH;

    fn render_listing(listing: &Listing) -> String {
        let mut out = Vec::new();
        write_listing(&mut out, listing).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_links_entries() {
        let listing = Listing {
            entries: vec![
                Entry {
                    kind: EntryKind::Folder,
                    name: "run1".to_string(),
                    path: "batch/run1".to_string(),
                    time: UNIX_EPOCH,
                },
                Entry {
                    kind: EntryKind::File,
                    name: "snap.json".to_string(),
                    path: "batch/run1/snap.json".to_string(),
                    time: UNIX_EPOCH,
                },
            ],
            current: "batch".to_string(),
            parent: Some(String::new()),
        };
        let html = render_listing(&listing);
        assert!(html.contains(r#"href="/?path=batch/run1""#));
        assert!(html.contains(r#"href="/plot_view/batch/run1/snap.json""#));
        assert!(html.contains(r#"href="/?path=""#), "parent link back to root");
    }

    #[test]
    fn test_listing_at_root_has_no_parent_link() {
        let listing = Listing {
            entries: vec![],
            current: String::new(),
            parent: None,
        };
        let html = render_listing(&listing);
        assert!(!html.contains(">..<"));
    }

    #[test]
    fn test_listing_escapes_names() {
        let listing = Listing {
            entries: vec![Entry {
                kind: EntryKind::File,
                name: "a<b>&c.html".to_string(),
                path: "a<b>&c.html".to_string(),
                time: UNIX_EPOCH,
            }],
            current: String::new(),
            parent: None,
        };
        let html = render_listing(&listing);
        assert!(html.contains("a&lt;b&gt;&amp;c.html"));
    }

    #[test]
    fn test_view_renders_links_and_absences() {
        let view = ViewPage {
            filename: "batch/run2/snap.html".to_string(),
            parent: "batch/run2".to_string(),
            siblings: Neighbors {
                prev: Some("batch/run2/older.html".to_string()),
                next: None,
            },
            cross: Neighbors {
                prev: Some("batch/run1/snap.html".to_string()),
                next: Some("batch/run3/snap.html".to_string()),
            },
        };
        let mut out = Vec::new();
        write_view(&mut out, &view).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.contains(r#"src="/plot/batch/run2/snap.html""#));
        assert!(html.contains(r#"href="/plot_view/batch/run2/older.html""#));
        assert!(html.contains(r#"href="/plot_view/batch/run1/snap.html""#));
        assert!(html.contains(r#"href="/plot_view/batch/run3/snap.html""#));
        // The missing sibling renders as plain text, not a link
        assert!(html.contains(r#"<span class="absent">next in folder"#));
    }

    #[test]
    fn test_error_page_is_escaped() {
        let mut out = Vec::new();
        write_error(&mut out, "Malformed chart", "expected `,` at <line 3>").unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("Malformed chart"));
        assert!(html.contains("&lt;line 3&gt;"));
    }

    #[test]
    fn test_encode_path_keeps_slashes() {
        assert_eq!(encode_path("run 1/snap#2.json"), "run%201/snap%232.json");
        assert_eq!(encode_path("plain/path.html"), "plain/path.html");
    }
}
