//! MathML writer
//!
//! Serializes a parsed row with `quick-xml`. Text content is escaped here
//! and, with [`MathmlEncoding::Numeric`], every non-ASCII character is
//! written as a hexadecimal character reference.

use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::options::{MathmlEncoding, MathmlOptions};
use crate::parse::grammar::MathNode;
use crate::parse::symbols::FontVariant;

pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Errors from the underlying XML writer
#[derive(Debug, thiserror::Error)]
pub enum MathmlError {
    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("MathML output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

type Result<T> = std::result::Result<T, MathmlError>;

/// Render a parsed row as a complete `<math>` element
pub fn to_mathml(row: &[MathNode], display_style: bool, options: &MathmlOptions) -> Result<String> {
    let mut builder = MathmlBuilder::new(options);
    builder.write_math(row, display_style)?;
    builder.finish()
}

/// Writer state for one `<math>` element
struct MathmlBuilder<'o> {
    writer: Writer<Cursor<Vec<u8>>>,
    options: &'o MathmlOptions,
}

impl<'o> MathmlBuilder<'o> {
    fn new(options: &'o MathmlOptions) -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
            options,
        }
    }

    fn finish(self) -> Result<String> {
        let bytes = self.writer.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }

    fn write_math(&mut self, row: &[MathNode], display_style: bool) -> Result<()> {
        let mut math = BytesStart::new("math");
        math.push_attribute(("xmlns", MATHML_NAMESPACE));
        math.push_attribute(("display", if display_style { "block" } else { "inline" }));

        if row.is_empty() {
            self.writer.write_event(Event::Empty(math))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(math))?;
        for node in row {
            self.write_node(node, display_style, None)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("math")))?;
        Ok(())
    }

    fn write_node(
        &mut self,
        node: &MathNode,
        display: bool,
        variant: Option<FontVariant>,
    ) -> Result<()> {
        match node {
            MathNode::Identifier { text, upright, .. } => {
                let variant = variant.or(if *upright { Some(FontVariant::Normal) } else { None });
                self.write_identifier(text, variant)
            }
            MathNode::Number(text) => {
                let attrs = match variant {
                    Some(FontVariant::Bold) => vec![("mathvariant", "bold")],
                    _ => vec![],
                };
                self.write_leaf("mn", &attrs, text)
            }
            MathNode::Operator { text, fence, .. } => {
                let attrs = if *fence { vec![("stretchy", "false")] } else { vec![] };
                self.write_leaf("mo", &attrs, text)
            }
            MathNode::LargeOperator {
                text,
                movable_limits,
                ..
            } => {
                let attrs = if *movable_limits {
                    vec![("movablelimits", "true")]
                } else {
                    vec![]
                };
                self.write_leaf("mo", &attrs, text)
            }
            MathNode::Function { tex, .. } => {
                self.write_function_name(tex)?;
                self.write_function_application()
            }
            MathNode::Space { width, .. } => {
                let mut space = BytesStart::new("mspace");
                space.push_attribute(("width", width.as_str()));
                self.writer.write_event(Event::Empty(space))?;
                Ok(())
            }
            MathNode::Text { text, .. } => self.write_leaf("mtext", &[], text),
            MathNode::Group(children) => self.write_row(children, display, variant),
            MathNode::Scripts {
                base,
                sub,
                sup,
                limits,
            } => self.write_scripts(base, sub.as_deref(), sup.as_deref(), *limits, display, variant),
            MathNode::Fraction {
                tex,
                numerator,
                denominator,
            } => {
                let is_binom = tex == "\\binom";
                if is_binom {
                    self.open("mrow", &[])?;
                    self.write_leaf("mo", &[], "(")?;
                }
                let style = match tex.as_str() {
                    "\\dfrac" => Some("true"),
                    "\\tfrac" => Some("false"),
                    _ => None,
                };
                if let Some(style) = style {
                    self.open("mstyle", &[("displaystyle", style)])?;
                }
                let attrs = if is_binom {
                    vec![("linethickness", "0")]
                } else {
                    vec![]
                };
                self.open("mfrac", &attrs)?;
                self.write_node(numerator, false, variant)?;
                self.write_node(denominator, false, variant)?;
                self.close("mfrac")?;
                if style.is_some() {
                    self.close("mstyle")?;
                }
                if is_binom {
                    self.write_leaf("mo", &[], ")")?;
                    self.close("mrow")?;
                }
                Ok(())
            }
            MathNode::Sqrt { index, body } => match index {
                Some(index) => {
                    self.open("mroot", &[])?;
                    self.write_node(body, false, variant)?;
                    self.write_node(index, false, variant)?;
                    self.close("mroot")
                }
                None => {
                    self.open("msqrt", &[])?;
                    self.write_node(body, false, variant)?;
                    self.close("msqrt")
                }
            },
            MathNode::Fenced {
                open, close, body, ..
            } => {
                self.open("mrow", &[])?;
                if !open.is_empty() {
                    self.write_leaf("mo", &[("fence", "true"), ("stretchy", "true")], open)?;
                }
                for child in body {
                    self.write_node(child, display, variant)?;
                }
                if !close.is_empty() {
                    self.write_leaf("mo", &[("fence", "true"), ("stretchy", "true")], close)?;
                }
                self.close("mrow")
            }
            MathNode::Accent {
                mark,
                under,
                stretchy,
                body,
                ..
            } => {
                let (element, accent_attr) = if *under {
                    ("munder", "accentunder")
                } else {
                    ("mover", "accent")
                };
                self.open(element, &[(accent_attr, "true")])?;
                self.write_node(body, display, variant)?;
                let stretch = if *stretchy { "true" } else { "false" };
                self.write_leaf("mo", &[("stretchy", stretch)], mark)?;
                self.close(element)
            }
            MathNode::Font { variant, body, .. } => self.write_node(body, display, Some(*variant)),
        }
    }

    /// Children as an `<mrow>`, collapsed when there is exactly one
    fn write_row(
        &mut self,
        children: &[MathNode],
        display: bool,
        variant: Option<FontVariant>,
    ) -> Result<()> {
        if children.len() == 1 {
            return self.write_node(&children[0], display, variant);
        }
        if children.is_empty() {
            self.writer
                .write_event(Event::Empty(BytesStart::new("mrow")))?;
            return Ok(());
        }
        self.open("mrow", &[])?;
        for child in children {
            self.write_node(child, display, variant)?;
        }
        self.close("mrow")
    }

    fn write_scripts(
        &mut self,
        base: &MathNode,
        sub: Option<&MathNode>,
        sup: Option<&MathNode>,
        limits: Option<bool>,
        display: bool,
        variant: Option<FontVariant>,
    ) -> Result<()> {
        let base_takes_limits = match base {
            MathNode::LargeOperator { movable_limits, .. } => *movable_limits && display,
            MathNode::Function { limits, .. } => *limits && display,
            _ => false,
        };
        let under_over = limits.unwrap_or(base_takes_limits);

        let element = match (under_over, sub.is_some(), sup.is_some()) {
            (_, false, false) => {
                // bare `\limits`/`\nolimits`
                return self.write_node(base, display, variant);
            }
            (true, true, true) => "munderover",
            (true, true, false) => "munder",
            (true, false, true) => "mover",
            (false, true, true) => "msubsup",
            (false, true, false) => "msub",
            (false, false, true) => "msup",
        };

        self.open(element, &[])?;
        // The function application operator goes after the whole script element
        let function_base = match base {
            MathNode::Function { tex, .. } => {
                self.write_function_name(tex)?;
                true
            }
            other => {
                self.write_node(other, display, variant)?;
                false
            }
        };
        if let Some(sub) = sub {
            self.write_node(sub, false, variant)?;
        }
        if let Some(sup) = sup {
            self.write_node(sup, false, variant)?;
        }
        self.close(element)?;
        if function_base {
            self.write_function_application()?;
        }
        Ok(())
    }

    fn write_function_name(&mut self, tex: &str) -> Result<()> {
        self.write_leaf("mi", &[], tex.trim_start_matches('\\'))
    }

    /// U+2061 FUNCTION APPLICATION
    fn write_function_application(&mut self) -> Result<()> {
        self.write_leaf("mo", &[], "\u{2061}")
    }

    fn write_identifier(&mut self, text: &str, variant: Option<FontVariant>) -> Result<()> {
        if let Some(variant) = variant {
            if self.options.allow_plane1 {
                let mapped: Option<String> = text.chars().map(|c| variant.plane1_char(c)).collect();
                if let Some(mapped) = mapped {
                    return self.write_leaf("mi", &[], &mapped);
                }
            }
            return self.write_leaf("mi", &[("mathvariant", variant.mathvariant())], text);
        }
        self.write_leaf("mi", &[], text)
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attrs)?;
        let encoded = encode_text(text, self.options.encoding);
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(encoded)))?;
        self.close(name)
    }
}

/// XML-escape `text`, then apply the configured character encoding
fn encode_text(text: &str, encoding: MathmlEncoding) -> String {
    let escaped = escape(text);
    match encoding {
        MathmlEncoding::Raw => escaped.into_owned(),
        MathmlEncoding::Numeric => escaped
            .chars()
            .map(|c| {
                if c.is_ascii() {
                    c.to_string()
                } else {
                    format!("&#x{:X};", c as u32)
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::grammar::parse;
    use crate::parse::tokens::tokenize;

    fn render(input: &str, display: bool) -> String {
        render_with(input, display, &MathmlOptions::default())
    }

    fn render_with(input: &str, display: bool, options: &MathmlOptions) -> String {
        let row = parse(&tokenize(input, 1000).unwrap()).unwrap();
        to_mathml(&row, display, options).unwrap()
    }

    fn body(input: &str) -> String {
        let xml = render(input, false);
        let start = xml.find('>').unwrap() + 1;
        let end = xml.rfind("</math>").unwrap();
        xml[start..end].to_string()
    }

    #[test]
    fn test_math_wrapper() {
        assert_eq!(
            render("x", true),
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="block"><mi>x</mi></math>"#
        );
        assert_eq!(
            render("", false),
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="inline"/>"#
        );
    }

    #[test]
    fn test_superscript() {
        assert_eq!(body("x^2"), "<msup><mi>x</mi><mn>2</mn></msup>");
    }

    #[test]
    fn test_subsup_order_is_base_sub_sup() {
        assert_eq!(
            body("x^a_b"),
            "<msubsup><mi>x</mi><mi>b</mi><mi>a</mi></msubsup>"
        );
    }

    #[test]
    fn test_single_child_groups_collapse() {
        assert_eq!(body("{{x}}"), "<mi>x</mi>");
        assert_eq!(body("{}^2"), "<msup><mrow/><mn>2</mn></msup>");
    }

    #[test]
    fn test_operators_escaped() {
        assert_eq!(body("a<b"), "<mi>a</mi><mo>&lt;</mo><mi>b</mi>");
        assert_eq!(body("a-b"), "<mi>a</mi><mo>\u{2212}</mo><mi>b</mi>");
    }

    #[test]
    fn test_large_operator_limits_depend_on_display() {
        let inline = render(r"\sum_{i}^{n}", false);
        assert!(inline.contains("<msubsup><mo movablelimits=\"true\">"));
        let display = render(r"\sum_{i}^{n}", true);
        assert!(display.contains("<munderover><mo movablelimits=\"true\">"));
        let forced = render(r"\int\limits_0^1", false);
        assert!(forced.contains("<munderover>"));
    }

    #[test]
    fn test_function_application() {
        assert_eq!(
            body(r"\sin x"),
            "<mi>sin</mi><mo>\u{2061}</mo><mi>x</mi>"
        );
        // Scripted function name: application operator follows the script element
        assert_eq!(
            body(r"\log_2 x"),
            "<msub><mi>log</mi><mn>2</mn></msub><mo>\u{2061}</mo><mi>x</mi>"
        );
    }

    #[test]
    fn test_fraction_root_and_fences() {
        assert_eq!(
            body(r"\frac{a}{b}"),
            "<mfrac><mi>a</mi><mi>b</mi></mfrac>"
        );
        assert_eq!(
            body(r"\sqrt[3]{x}"),
            "<mroot><mi>x</mi><mn>3</mn></mroot>"
        );
        assert_eq!(
            body(r"\left(x\right)"),
            "<mrow><mo fence=\"true\" stretchy=\"true\">(</mo><mi>x</mi><mo fence=\"true\" stretchy=\"true\">)</mo></mrow>"
        );
    }

    #[test]
    fn test_font_variants() {
        assert_eq!(
            body(r"\mathbf{x}"),
            "<mi mathvariant=\"bold\">x</mi>"
        );
        assert_eq!(
            body(r"\Gamma"),
            "<mi mathvariant=\"normal\">\u{0393}</mi>"
        );
    }

    #[test]
    fn test_plane1_option() {
        let options = MathmlOptions {
            allow_plane1: true,
            ..MathmlOptions::default()
        };
        let xml = render_with(r"\mathbb{R}", false, &options);
        assert!(xml.contains("<mi>ℝ</mi>"));

        let xml = render_with(r"\mathbb{R}", false, &MathmlOptions::default());
        assert!(xml.contains("<mi mathvariant=\"double-struck\">R</mi>"));
    }

    #[test]
    fn test_numeric_encoding() {
        let options = MathmlOptions {
            encoding: MathmlEncoding::Numeric,
            ..MathmlOptions::default()
        };
        let xml = render_with(r"\alpha<1", false, &options);
        assert!(xml.contains("<mi>&#x3B1;</mi>"));
        assert!(xml.contains("<mo>&lt;</mo>"));
    }

    #[test]
    fn test_text_and_space() {
        assert_eq!(
            body(r"\text{if}\quad"),
            "<mtext>if</mtext><mspace width=\"1em\"/>"
        );
    }
}
