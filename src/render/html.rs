use crate::Result;
use crate::render::BarRenderer;
use crate::results::BarSeries;

use anyhow::{Context, bail};
use std::fs;

/// Render a self-contained HTML bar chart (series embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_bar_chart_html(title: &str, series: &BarSeries) -> Result<String> {
    if series.categories.len() != series.values.len() {
        bail!(
            "bar series has {} categories but {} values",
            series.categories.len(),
            series.values.len()
        );
    }

    // `</` would close the script element early.
    let json = serde_json::to_string(series)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .main { padding: 12px 16px; }
  .muted { color: #777; font-size: 12px; }
  .row { display: flex; align-items: center; gap: 8px; margin: 3px 0; font-size: 13px; }
  .label { width: 280px; text-align: right; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
  .bar { height: 16px; background: #4c78a8; border-radius: 2px; min-width: 1px; }
  .num { font-variant-numeric: tabular-nums; color: #333; }
</style>
</head>
<body>
<header>
  <h2 style="margin: 0;">__TITLE__</h2>
  <div id="summary" class="muted"></div>
</header>
<div class="main" id="chart"></div>

<script>
// Embedded bar series (JSON object literal)
const DATA = __DATA__;

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;");
}

function render() {
  const chart = document.getElementById("chart");
  const max = DATA.values.reduce((m, v) => Math.max(m, v || 0), 0);
  document.getElementById("summary").textContent =
    `${DATA.categories.length} terms, y axis: Count`;

  if (!DATA.categories.length) {
    chart.innerHTML = `<div class="muted">No results.</div>`;
    return;
  }

  chart.innerHTML = DATA.categories.map((term, i) => {
    const v = DATA.values[i] || 0;
    const pct = max > 0 ? (v / max) * 70 : 0;
    return `<div class="row">
      <div class="label" title="${escapeHtml(term)}">${escapeHtml(term)}</div>
      <div class="bar" style="width: ${pct}%"></div>
      <div class="num">${v.toLocaleString()}</div>
    </div>`;
  }).join("");
}

render();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(title))
        .replace("__DATA__", &json))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `BarRenderer` that keeps the last rendered page.
#[derive(Debug, Clone, Default)]
pub struct HtmlBarChart {
    title: String,
    html: Option<String>,
}

impl HtmlBarChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn write_to(&self, path: &str) -> Result<()> {
        let Some(html) = &self.html else {
            bail!("nothing rendered yet");
        };
        fs::write(path, html).with_context(|| format!("write chart {}", path))
    }
}

impl BarRenderer for HtmlBarChart {
    fn render_bar_series(&mut self, categories: &[String], values: &[f64]) -> Result<()> {
        let series = BarSeries {
            categories: categories.to_vec(),
            values: values.to_vec(),
        };
        self.html = Some(render_bar_chart_html(&self.title, &series)?);
        Ok(())
    }
}
