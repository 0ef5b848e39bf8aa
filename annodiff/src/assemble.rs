//! Document assembler: rendered lines to the final text blob.
//!
//! - Plain text: indentation string per level, regions as `[(+) ...]`-style
//!   brackets, lines joined with `\n`
//! - HTML body: one `<p>` per line indented by a pixel multiple, regions as
//!   `<span class="...">`, then one `<connection>` per move
//! - HTML page: the body wrapped in `<html>` with the companion stylesheet
//!   and connector script linked from `<head>`

use crate::interpret::{Connector, RenderedLine, RenderedOutput, Segment, escape_html};
use crate::options::{OutputMode, RenderOptions};
use std::fmt::Write;

/// Assemble rendered output into plain text or an HTML body fragment,
/// depending on the mode it was interpreted in.
pub fn assemble(output: &RenderedOutput, options: &RenderOptions) -> String {
    let mut out = String::new();
    match output.mode {
        OutputMode::Plain => write_plain(&mut out, output, options),
        OutputMode::Html => write_html_body(&mut out, output, options),
    }
    out
}

/// Assemble rendered output into a complete HTML page.
///
/// Plain output is embedded as an escaped `<pre>` block.
pub fn assemble_page(output: &RenderedOutput, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("<html>\n<head>\n");
    for href in &options.page.stylesheets {
        let _ = writeln!(
            out,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_attr(href)
        );
    }
    for src in &options.page.scripts {
        let _ = writeln!(
            out,
            "<script type=\"text/javascript\" src=\"{}\"></script>",
            escape_attr(src)
        );
    }
    out.push_str("</head>\n<body>\n");
    match output.mode {
        OutputMode::Html => write_html_body(&mut out, output, options),
        OutputMode::Plain => {
            let mut plain = String::new();
            write_plain(&mut plain, output, options);
            let _ = write!(out, "<pre>{}</pre>", escape_html(&plain));
        }
    }
    out.push_str("\n</body>\n</html>\n");
    out
}

fn write_plain(out: &mut String, output: &RenderedOutput, options: &RenderOptions) {
    for (i, line) in output.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_plain_line(out, line, options);
    }
}

fn write_plain_line(out: &mut String, line: &RenderedLine, options: &RenderOptions) {
    for _ in 0..line.indent {
        out.push_str(&options.indent);
    }
    for segment in &line.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Open(kind) => out.push_str(kind.plain_open()),
            Segment::Close(kind) => out.push_str(kind.plain_close()),
            Segment::Anchor(anchor) => {
                let _ = write!(out, "#{}", anchor.move_id());
            }
        }
    }
}

fn write_html_body(out: &mut String, output: &RenderedOutput, options: &RenderOptions) {
    for (i, line) in output.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_html_line(out, line, options);
    }
    for connector in &output.connectors {
        out.push('\n');
        write_connector(out, connector);
    }
}

fn write_html_line(out: &mut String, line: &RenderedLine, options: &RenderOptions) {
    let px = line.indent as u64 * u64::from(options.indent_px);
    let _ = write!(out, "<p style=\"text-indent:{px}px\">");
    for segment in &line.segments {
        match segment {
            // Escaped by the interpreter in HTML mode.
            Segment::Text(text) => out.push_str(text),
            Segment::Open(kind) => {
                let _ = write!(out, "<span class=\"{}\">", kind.css_class());
            }
            Segment::Close(_) => out.push_str("</span>"),
            Segment::Anchor(anchor) => {
                let _ = write!(out, "<span id=\"{anchor}\"></span>");
            }
        }
    }
    out.push_str("</p>");
}

fn write_connector(out: &mut String, connector: &Connector) {
    let _ = write!(
        out,
        "<connection from=\"#{}\" to=\"#{}\" fromX=\"0\" toX=\"0\" fromY=\"0.5\" toY=\"0.5\" tail></connection>",
        connector.origin(),
        connector.end()
    );
}

fn escape_attr(value: &str) -> String {
    escape_html(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::StyleKind;
    use crate::interpret::Anchor;
    use facet_testhelpers::test;

    fn line(indent: usize, segments: Vec<Segment>) -> RenderedLine {
        RenderedLine { indent, segments }
    }

    #[test]
    fn test_plain_brackets_and_indent() {
        let output = RenderedOutput {
            mode: OutputMode::Plain,
            lines: vec![
                line(0, vec![Segment::Text("<r>".into())]),
                line(
                    1,
                    vec![
                        Segment::Open(StyleKind::Modify),
                        Segment::Open(StyleKind::Strike),
                        Segment::Text("old".into()),
                        Segment::Close(StyleKind::Strike),
                        Segment::Text("<new/>".into()),
                        Segment::Close(StyleKind::Modify),
                    ],
                ),
                line(0, vec![Segment::Text("</r>".into())]),
            ],
            connectors: vec![],
        };
        let text = assemble(&output, &RenderOptions::plain().with_indent("  "));
        assert_eq!(text, "<r>\n  [(MODIFY) old => <new/>]\n</r>");
    }

    #[test]
    fn test_plain_anchor() {
        let output = RenderedOutput {
            mode: OutputMode::Plain,
            lines: vec![line(
                0,
                vec![
                    Segment::Anchor(Anchor::Origin(3)),
                    Segment::Open(StyleKind::MoveTo),
                    Segment::Text("<x/>".into()),
                    Segment::Close(StyleKind::MoveTo),
                ],
            )],
            connectors: vec![],
        };
        assert_eq!(assemble(&output, &RenderOptions::plain()), "#3[(MOVE_TO) <x/>]");
    }

    #[test]
    fn test_html_lines_and_connectors() {
        let output = RenderedOutput {
            mode: OutputMode::Html,
            lines: vec![line(
                2,
                vec![
                    Segment::Anchor(Anchor::End(0)),
                    Segment::Open(StyleKind::MoveFrom),
                    Segment::Text("&lt;x/&gt;".into()),
                    Segment::Close(StyleKind::MoveFrom),
                ],
            )],
            connectors: vec![Connector { move_id: 0 }],
        };
        let html = assemble(&output, &RenderOptions::html().with_indent_px(10));
        assert_eq!(
            html,
            "<p style=\"text-indent:20px\"><span id=\"move_to_0\"></span>\
             <span class=\"move_from\">&lt;x/&gt;</span></p>\n\
             <connection from=\"#move_from_0\" to=\"#move_to_0\" fromX=\"0\" toX=\"0\" \
             fromY=\"0.5\" toY=\"0.5\" tail></connection>"
        );
    }

    #[test]
    fn test_page_links_resources() {
        let output = RenderedOutput {
            mode: OutputMode::Html,
            lines: vec![line(0, vec![Segment::Text("x".into())])],
            connectors: vec![],
        };
        let page = assemble_page(&output, &RenderOptions::html());
        assert!(page.starts_with("<html>\n<head>\n"));
        assert!(page.contains("<link rel=\"stylesheet\" href=\"proof_html_stylesheet.css\">"));
        assert!(page.contains("<link rel=\"stylesheet\" href=\"domarrow.css\">"));
        assert!(page.contains("<script type=\"text/javascript\" src=\"domarrow.js\"></script>"));
        assert!(page.contains("<body>\n<p style=\"text-indent:0px\">x</p>\n</body>"));
    }

    #[test]
    fn test_page_embeds_plain_output_escaped() {
        let output = RenderedOutput {
            mode: OutputMode::Plain,
            lines: vec![line(0, vec![Segment::Text("<a/>".into())])],
            connectors: vec![],
        };
        let page = assemble_page(&output, &RenderOptions::plain());
        assert!(page.contains("<pre>&lt;a/&gt;</pre>"));
    }
}
