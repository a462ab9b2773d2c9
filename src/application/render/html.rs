//! HTML box layout: each node is a card, a vertical connector, then a row of children.

use std::fmt::Write;

use generational_arena::Index;

use crate::application::render::RenderOptions;
use crate::domain::OrgChart;

const STYLE: &str = r#"
.org-chart { display: flex; justify-content: center; gap: 2rem; font-family: sans-serif; }
.org-branch { display: flex; flex-direction: column; align-items: center; }
.org-node { border: 1px solid #cbd5e1; border-radius: 8px; padding: 0.75rem 1rem; text-align: center; min-width: 10rem; background: #fff; }
.org-avatar { width: 48px; height: 48px; border-radius: 50%; object-fit: cover; }
.org-name { font-weight: 600; }
.org-position { color: #475569; }
.org-department { color: #64748b; font-size: 0.85em; }
.org-connector { width: 2px; height: 1.5rem; background: #cbd5e1; }
.org-children { display: flex; gap: 1.5rem; border-top: 2px solid #cbd5e1; padding-top: 1.5rem; }
.org-empty { color: #64748b; text-align: center; }
"#;

pub fn render_html(chart: &OrgChart, options: &RenderOptions) -> String {
    let body = if chart.is_empty() {
        format!(
            "<p class=\"org-empty\">{}</p>\n",
            escape_html(&options.empty_message)
        )
    } else {
        let mut out = String::from("<div class=\"org-chart\">\n");
        for &root in chart.roots() {
            write_branch(chart, root, options, 1, &mut out);
        }
        out.push_str("</div>\n");
        out
    };

    if options.standalone {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Organization Chart</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
        )
    } else {
        body
    }
}

fn write_branch(
    chart: &OrgChart,
    idx: Index,
    options: &RenderOptions,
    level: usize,
    out: &mut String,
) {
    let Some(node) = chart.get_node(idx) else {
        return;
    };
    let pad = "  ".repeat(level);
    let leader = &node.leader;

    // write! into a String cannot fail
    let _ = writeln!(out, "{pad}<div class=\"org-branch\">");
    let _ = writeln!(
        out,
        "{pad}  <div class=\"org-node\" data-id=\"{}\" data-tier=\"{}\">",
        escape_html(&leader.id),
        node.tier
    );
    if options.show_avatars {
        if let Some(url) = leader.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let _ = writeln!(
                out,
                "{pad}    <img class=\"org-avatar\" src=\"{}\" alt=\"{}\">",
                escape_html(url),
                escape_html(&leader.name)
            );
        }
    }
    let _ = writeln!(
        out,
        "{pad}    <div class=\"org-name\">{}</div>",
        escape_html(&leader.name)
    );
    if let Some(position) = leader.position_label() {
        let _ = writeln!(
            out,
            "{pad}    <div class=\"org-position\">{}</div>",
            escape_html(position)
        );
    }
    if let Some(department) = leader.department_key() {
        let _ = writeln!(
            out,
            "{pad}    <div class=\"org-department\">{}</div>",
            escape_html(department)
        );
    }
    let _ = writeln!(out, "{pad}  </div>");

    if !node.children.is_empty() {
        let _ = writeln!(out, "{pad}  <div class=\"org-connector\"></div>");
        let _ = writeln!(out, "{pad}  <div class=\"org-children\">");
        for &child in &node.children {
            write_branch(chart, child, options, level + 2, out);
        }
        let _ = writeln!(out, "{pad}  </div>");
    }
    let _ = writeln!(out, "{pad}</div>");
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
