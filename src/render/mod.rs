//! Visualization output.

pub mod html;

pub use html::{HtmlBarChart, render_bar_chart_html};

/// Draws (or replaces) a bar series. `categories` and `values` are index-aligned.
pub trait BarRenderer {
    fn render_bar_series(&mut self, categories: &[String], values: &[f64]) -> crate::Result<()>;
}
