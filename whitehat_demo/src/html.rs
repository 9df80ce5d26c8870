// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static HTML report wrapping the rendered views.

use std::fmt::Write as _;

/// One view in the report.
#[derive(Debug)]
pub(crate) struct Section {
    pub(crate) title: String,
    pub(crate) svg: String,
    pub(crate) notes: Vec<String>,
}

pub(crate) fn render_report(title: &str, sections: &[Section]) -> String {
    let title = escape_text(title);
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{title}</title>");
    out.push_str(
        "<style>\nbody { font-family: sans-serif; margin: 2em; }\n\
         section { margin-bottom: 2em; }\n\
         .notes { color: #555; }\n</style>\n",
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{title}</h1>");
    for section in sections {
        out.push_str("<section>\n");
        let _ = writeln!(out, "<h2>{}</h2>", escape_text(&section.title));
        out.push_str(&section.svg);
        if !section.notes.is_empty() {
            out.push_str("<ul class=\"notes\">\n");
            for note in &section.notes {
                let _ = writeln!(out, "<li>{}</li>", escape_text(note));
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_embedded_in_order() {
        let html = render_report(
            "Deaths & rates",
            &[
                Section {
                    title: "Map".into(),
                    svg: "<svg id=\"map\"></svg>\n".into(),
                    notes: vec!["zoomed to <Kansas>".into()],
                },
                Section {
                    title: "Bars".into(),
                    svg: "<svg id=\"bars\"></svg>\n".into(),
                    notes: Vec::new(),
                },
            ],
        );
        assert!(html.contains("<title>Deaths &amp; rates</title>"));
        assert!(html.contains("<li>zoomed to &lt;Kansas&gt;</li>"));
        let map_at = html.find("id=\"map\"").unwrap();
        let bars_at = html.find("id=\"bars\"").unwrap();
        assert!(map_at < bars_at);
        assert_eq!(html.matches("<ul").count(), 1);
    }
}
