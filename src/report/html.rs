//! HTML fragment renderer.

use super::{plural, Renderer, Report};
use chrono::NaiveDate;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, report: &Report<'_>, generated: NaiveDate) -> String {
        let s = &report.summary;
        let mut out = String::new();
        out.push_str("<h2>Summary</h2>\n");
        out.push_str("<p>PhoneLab's instrumented Android platform currently contains:</p>\n");
        out.push_str("<ul>\n");
        out.push_str(&format!(
            "<li><b>{}</b> tags, <b>{}</b> actions,</li>\n",
            s.tags, s.actions
        ));
        out.push_str(&format!("<li>... in <b>{}</b> categories,</li>\n", s.categories));
        out.push_str(&format!(
            "<li>... added by <b>{}</b> institution{}.</li>\n",
            s.institutions,
            plural(s.institutions)
        ));
        out.push_str("</ul>\n");

        for cat in &report.categories {
            out.push_str(&format!(
                "<h2><b>Category</b>: {}</h2>\n",
                html_escape(cat.category)
            ));
            for group in &cat.tags {
                out.push_str(&format!(
                    "<h4><b>Tag</b>: <code>{}</code></h4>\n",
                    html_escape(group.tag)
                ));
                out.push_str("<ol>\n");
                for r in &group.occurrences {
                    out.push_str("<li style=\"margin-bottom: 10px;\">\n");
                    out.push_str(&format!(
                        "<b>Action</b>: <code>{}</code><br>\n",
                        html_escape(&r.action)
                    ));
                    out.push_str(&format!(
                        "<b>File</b>: <code><a href=\"{}\" target=\"_blank\"><b>{}</b></a>/<a href=\"{}\" target=\"_blank\">{}:{}</a></code><br>\n",
                        html_escape(&r.project.url()),
                        html_escape(&r.project.relative_path),
                        html_escape(&r.file_url()),
                        html_escape(&r.relative_file()),
                        r.line_number
                    ));
                    out.push_str(&format!(
                        "<b>Description</b>: {}<br>\n",
                        html_escape(&r.description)
                    ));
                    out.push_str("</li>\n");
                }
                out.push_str("</ol>\n");
            }
        }

        out.push_str("<hr>\n");
        out.push_str(&format!("<p><i>Last updated {}.</i></p>\n", generated));
        out
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
