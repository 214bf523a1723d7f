//! Rendering JSON chart descriptions to standalone HTML
//!
//! A chart description is the Plotly serialization format: an object with
//! `data` and `layout` keys (and optionally `config`). Rendering produces
//! a self-contained HTML document that pulls the Plotly runtime from its
//! CDN and enables responsive layout.
//!
//! Rendered output is content-addressed: the filename embeds a hash of
//! the source JSON, so the same chart always maps to the same file and
//! two different charts never clobber each other.

use crate::resolve::PlotRoot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};

/// Plotly runtime loaded by rendered documents.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

/// A deserialized Plotly chart description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDescription {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub layout: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ChartDescription {
    /// The Plotly config for the rendered page: whatever the description
    /// carried, with the responsive flag forced on.
    fn render_config(&self) -> Value {
        let mut config = match &self.config {
            Some(Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        config.insert("responsive".to_string(), Value::Bool(true));
        Value::Object(config)
    }
}

/// Render the chart description at root-relative `rel_path` and persist
/// it under the plot root. Returns the root-relative filename of the
/// rendered document.
///
/// Parse failures surface as `InvalidData` so the caller can show a
/// readable error page instead of a bare server fault.
pub fn render_json_chart(root: &PlotRoot, rel_path: &str) -> io::Result<String> {
    let source = root.resolve_file(rel_path)?;
    let bytes = fs::read(&source)?;

    let chart: ChartDescription = serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed chart description {}: {}", rel_path, e),
        )
    })?;

    let filename = rendered_filename(&bytes);
    let target = root.path().join(&filename);
    // Content-addressed, so an existing file already holds this chart
    if !target.exists() {
        let mut out = fs::File::create(&target)?;
        write_document(&mut out, &chart)?;
    }
    Ok(filename)
}

/// Filename for the rendered form of a chart description with the given
/// source bytes.
pub fn rendered_filename(source: &[u8]) -> String {
    let digest = Sha256::digest(source);
    let mut hex = String::with_capacity(16);
    for byte in &digest[..8] {
        hex.push_str(&format!("{:02x}", byte));
    }
    format!("plot_{}.html", hex)
}

fn write_document<W: Write>(writer: &mut W, chart: &ChartDescription) -> io::Result<()> {
    let data = to_json(&Value::Array(chart.data.clone()))?;
    let layout = to_json(&chart.layout)?;
    let config = to_json(&chart.render_config())?;

    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chart</title>
    <script src="{cdn}"></script>
    <style>
        html, body {{ margin: 0; padding: 0; height: 100%; }}
        #chart {{ width: 100%; height: 100%; }}
    </style>
</head>
<body>
    <div id="chart"></div>
    <script>
        Plotly.newPlot("chart", {data}, {layout}, {config});
    </script>
</body>
</html>
"#,
        cdn = PLOTLY_CDN,
        data = data,
        layout = layout,
        config = config,
    )
}

fn to_json(value: &Value) -> io::Result<String> {
    serde_json::to_string(value).map_err(io::Error::other)
}
