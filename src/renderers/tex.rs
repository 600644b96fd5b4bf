//! Normalized ("purified") TeX writer
//!
//! Re-emits a parsed row in canonical form: every argument and script
//! braced, subscripts before superscripts, whitespace only where a command
//! name would otherwise run into a following letter. The full form wraps
//! that in a standalone LaTeX document.

use crate::options::PurifiedTexOptions;
use crate::parse::grammar::MathNode;

/// Canonical TeX for the row, prefixed with `\displaystyle` in display style
pub fn purified_tex_only(row: &[MathNode], display_style: bool) -> String {
    let mut out = TexBuilder::default();
    if display_style {
        out.push("\\displaystyle");
    }
    for node in row {
        out.write_node(node);
    }
    out.into_string()
}

/// A complete LaTeX document rendering the row in math mode
pub fn purified_tex(row: &[MathNode], display_style: bool, options: &PurifiedTexOptions) -> String {
    let needs_amssymb = row
        .iter()
        .any(|node| node.any_font(&|variant| variant.needs_amssymb()));

    let mut lines = vec![
        "\\nonstopmode".to_string(),
        format!(
            "\\documentclass[{}]{{{}}}",
            options.font_size, options.document_class
        ),
        "\\usepackage{amsmath}".to_string(),
    ];
    if needs_amssymb {
        lines.push("\\usepackage{amssymb}".to_string());
    }
    lines.extend(options.extra_preamble.iter().cloned());
    lines.push("\\pagestyle{empty}".to_string());
    lines.push("\\begin{document}".to_string());
    lines.push(format!("${}$", purified_tex_only(row, display_style)));
    lines.push("\\end{document}".to_string());

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

#[derive(Default)]
struct TexBuilder {
    buffer: String,
}

impl TexBuilder {
    fn into_string(self) -> String {
        self.buffer
    }

    /// Append a piece, separating a trailing command word from a following letter
    fn push(&mut self, piece: &str) {
        let starts_with_letter = piece.chars().next().map_or(false, |c| c.is_ascii_alphabetic());
        if starts_with_letter && ends_with_command_word(&self.buffer) {
            self.buffer.push(' ');
        }
        self.buffer.push_str(piece);
    }

    fn write_node(&mut self, node: &MathNode) {
        match node {
            MathNode::Identifier { tex, .. }
            | MathNode::Operator { tex, .. }
            | MathNode::LargeOperator { tex, .. }
            | MathNode::Function { tex, .. }
            | MathNode::Space { tex, .. } => self.push(tex),
            MathNode::Number(text) => self.push(text),
            MathNode::Text { tex, text } => {
                self.push(tex);
                self.push("{");
                self.push(text);
                self.push("}");
            }
            MathNode::Group(children) => {
                self.push("{");
                for child in children {
                    self.write_node(child);
                }
                self.push("}");
            }
            MathNode::Scripts {
                base,
                sub,
                sup,
                limits,
            } => {
                self.write_node(base);
                match limits {
                    Some(true) => self.push("\\limits"),
                    Some(false) => self.push("\\nolimits"),
                    None => {}
                }
                if let Some(sub) = sub {
                    self.push("_");
                    self.write_argument(sub);
                }
                if let Some(sup) = sup {
                    self.push("^");
                    self.write_argument(sup);
                }
            }
            MathNode::Fraction {
                tex,
                numerator,
                denominator,
            } => {
                self.push(tex);
                self.write_argument(numerator);
                self.write_argument(denominator);
            }
            MathNode::Sqrt { index, body } => {
                self.push("\\sqrt");
                if let Some(index) = index {
                    self.push("[");
                    self.write_contents(index);
                    self.push("]");
                }
                self.write_argument(body);
            }
            MathNode::Fenced {
                open_tex,
                close_tex,
                body,
                ..
            } => {
                self.push("\\left");
                self.push(open_tex);
                for child in body {
                    self.write_node(child);
                }
                self.push("\\right");
                self.push(close_tex);
            }
            MathNode::Accent { tex, body, .. } | MathNode::Font { tex, body, .. } => {
                self.push(tex);
                self.write_argument(body);
            }
        }
    }

    /// `{...}` around a node, without doubling braces on an existing group
    fn write_argument(&mut self, node: &MathNode) {
        self.push("{");
        self.write_contents(node);
        self.push("}");
    }

    fn write_contents(&mut self, node: &MathNode) {
        match node {
            MathNode::Group(children) => {
                for child in children {
                    self.write_node(child);
                }
            }
            other => self.write_node(other),
        }
    }
}

/// True if `s` ends in `\` followed by one or more letters
fn ends_with_command_word(s: &str) -> bool {
    let trimmed = s.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    trimmed.len() < s.len() && trimmed.ends_with('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::grammar::parse;
    use crate::parse::tokens::tokenize;

    fn purify(input: &str) -> String {
        let row = parse(&tokenize(input, 1000).unwrap()).unwrap();
        purified_tex_only(&row, false)
    }

    #[test]
    fn test_scripts_are_braced_sub_first() {
        assert_eq!(purify("x^2"), "x^{2}");
        assert_eq!(purify("x^a_b"), "x_{b}^{a}");
        assert_eq!(purify("x^{ab}"), "x^{ab}");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(purify("a  +   b"), "a+b");
        assert_eq!(purify(r"\alpha x"), "\\alpha x");
        assert_eq!(purify(r"\alpha+x"), "\\alpha+x");
        assert_eq!(purify(r"\sin   \theta"), "\\sin\\theta");
    }

    #[test]
    fn test_arguments_braced() {
        assert_eq!(purify(r"\frac12"), "\\frac{1}{2}");
        assert_eq!(purify(r"\sqrt[3]x"), "\\sqrt[3]{x}");
        assert_eq!(purify(r"\mathbf x"), "\\mathbf{x}");
        assert_eq!(purify(r"\left( x \right."), "\\left(x\\right.");
    }

    #[test]
    fn test_limits_kept() {
        assert_eq!(purify(r"\sum \limits _i"), "\\sum\\limits_{i}");
    }

    #[test]
    fn test_display_prefix() {
        let row = parse(&tokenize("x", 10).unwrap()).unwrap();
        assert_eq!(purified_tex_only(&row, true), "\\displaystyle x");
    }

    #[test]
    fn test_document_packages() {
        let options = PurifiedTexOptions::default();
        let row = parse(&tokenize("x", 10).unwrap()).unwrap();
        let doc = purified_tex(&row, false, &options);
        assert!(doc.starts_with("\\nonstopmode\n\\documentclass[12pt]{article}\n"));
        assert!(doc.contains("\\usepackage{amsmath}"));
        assert!(!doc.contains("amssymb"));
        assert!(doc.contains("\n$x$\n"));
        assert!(doc.ends_with("\\end{document}\n"));

        let row = parse(&tokenize(r"\mathbb{R}", 10).unwrap()).unwrap();
        let doc = purified_tex(&row, false, &options);
        assert!(doc.contains("\\usepackage{amssymb}"));
    }

    #[test]
    fn test_extra_preamble() {
        let options = PurifiedTexOptions {
            extra_preamble: vec!["\\usepackage{color}".to_string()],
            ..PurifiedTexOptions::default()
        };
        let row = parse(&tokenize("x", 10).unwrap()).unwrap();
        let doc = purified_tex(&row, false, &options);
        let color = doc.find("\\usepackage{color}").unwrap();
        let begin = doc.find("\\begin{document}").unwrap();
        assert!(color < begin);
    }
}
