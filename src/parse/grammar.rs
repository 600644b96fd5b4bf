//! Recursive descent parser for TeX math
//!
//! Turns the token list into a [`MathNode`] tree. The tree keeps both the
//! canonical TeX spelling of every leaf and the character it renders as,
//! so the MathML writer and the normalized-TeX writer can walk the same
//! structure.

use super::symbols::{self, FontVariant, Symbol};
use super::tokens::{Token, TokenType, TEXT_COMMANDS};
use crate::engine::TexException;
use crate::options::DEFAULT_MAX_NESTING;

/// Parse tree node
#[derive(Clone, Debug, PartialEq)]
pub enum MathNode {
    /// `<mi>`: letters, Greek letters, `\infty`
    Identifier {
        tex: String,
        text: String,
        upright: bool,
    },
    /// `<mn>`: digit run, possibly with one decimal point
    Number(String),
    /// `<mo>`
    Operator {
        tex: String,
        text: String,
        fence: bool,
    },
    /// `\sum`, `\int`, ...
    LargeOperator {
        tex: String,
        text: String,
        movable_limits: bool,
    },
    /// `\sin`, `\lim`, ...
    Function { tex: String, limits: bool },
    /// `\,`, `\quad`, `~`
    Space { tex: String, width: String },
    /// `\text{...}` with the raw text
    Text { tex: String, text: String },
    /// `{ ... }`
    Group(Vec<MathNode>),
    Scripts {
        base: Box<MathNode>,
        sub: Option<Box<MathNode>>,
        sup: Option<Box<MathNode>>,
        /// `Some(true)` for `\limits`, `Some(false)` for `\nolimits`
        limits: Option<bool>,
    },
    /// `\frac`, `\dfrac`, `\tfrac`, `\binom`
    Fraction {
        tex: String,
        numerator: Box<MathNode>,
        denominator: Box<MathNode>,
    },
    Sqrt {
        index: Option<Box<MathNode>>,
        body: Box<MathNode>,
    },
    /// `\left ... \right`
    Fenced {
        open_tex: String,
        open: String,
        close_tex: String,
        close: String,
        body: Vec<MathNode>,
    },
    Accent {
        tex: String,
        mark: String,
        under: bool,
        stretchy: bool,
        body: Box<MathNode>,
    },
    Font {
        tex: String,
        variant: FontVariant,
        body: Box<MathNode>,
    },
}

impl MathNode {
    /// True if any node in this subtree uses the given font variant predicate
    pub fn any_font(&self, pred: &impl Fn(FontVariant) -> bool) -> bool {
        match self {
            MathNode::Font { variant, body, .. } => pred(*variant) || body.any_font(pred),
            MathNode::Group(children) | MathNode::Fenced { body: children, .. } => {
                children.iter().any(|c| c.any_font(pred))
            }
            MathNode::Scripts { base, sub, sup, .. } => {
                base.any_font(pred)
                    || sub.as_ref().map_or(false, |n| n.any_font(pred))
                    || sup.as_ref().map_or(false, |n| n.any_font(pred))
            }
            MathNode::Fraction {
                numerator,
                denominator,
                ..
            } => numerator.any_font(pred) || denominator.any_font(pred),
            MathNode::Sqrt { index, body } => {
                body.any_font(pred) || index.as_ref().map_or(false, |n| n.any_font(pred))
            }
            MathNode::Accent { body, .. } => body.any_font(pred),
            _ => false,
        }
    }
}

/// Where a row stops
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stop {
    EndOfInput,
    CloseBrace,
    /// `]` closing the optional argument of `\sqrt`
    CloseBracket,
    /// `\right` closing a `\left`
    Right,
}

/// Parse a token list into the top-level row with the default nesting limit
pub fn parse(tokens: &[Token]) -> Result<Vec<MathNode>, TexException> {
    parse_with_limit(tokens, DEFAULT_MAX_NESTING)
}

/// Parse a token list, failing with `TooDeeplyNested` once groups and
/// arguments nest deeper than `max_nesting`
///
/// Every recursive path runs through a row or an argument, so this also
/// bounds the depth of the returned tree.
pub fn parse_with_limit(
    tokens: &[Token],
    max_nesting: usize,
) -> Result<Vec<MathNode>, TexException> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_nesting,
    };
    let row = parser.parse_row(Stop::EndOfInput)?;
    log::debug!("parsed {} top-level nodes", row.len());
    Ok(row)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(t) if t.token_type == TokenType::Whitespace) {
            self.pos += 1;
        }
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, TexException>,
    ) -> Result<T, TexException> {
        if self.depth >= self.max_nesting {
            return Err(TexException::new(
                "TooDeeplyNested",
                vec![self.max_nesting.to_string()],
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_row(&mut self, stop: Stop) -> Result<Vec<MathNode>, TexException> {
        self.nested(|parser| parser.parse_row_items(stop))
    }

    fn parse_row_items(&mut self, stop: Stop) -> Result<Vec<MathNode>, TexException> {
        let mut row = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return match stop {
                    Stop::EndOfInput => Ok(row),
                    Stop::CloseBrace => Err(TexException::new("UnmatchedOpenBrace", vec![])),
                    Stop::CloseBracket => {
                        Err(TexException::new("MissingCloseBracket", vec!["\\sqrt".into()]))
                    }
                    Stop::Right => Err(TexException::new("UnmatchedLeft", vec![])),
                };
            };

            match token.token_type {
                TokenType::Whitespace => {
                    self.pos += 1;
                }
                TokenType::RBrace => {
                    if stop == Stop::CloseBrace {
                        self.pos += 1;
                        return Ok(row);
                    }
                    return Err(TexException::new("UnmatchedCloseBrace", vec![]));
                }
                TokenType::Symbol if token.text == "]" && stop == Stop::CloseBracket => {
                    self.pos += 1;
                    return Ok(row);
                }
                TokenType::Command if token.text == "\\right" => {
                    if stop == Stop::Right {
                        return Ok(row);
                    }
                    return Err(TexException::new("UnmatchedRight", vec![]));
                }
                TokenType::Ampersand => {
                    return Err(TexException::new("IllegalAlignment", vec!["&".into()]));
                }
                TokenType::Command if token.text == "\\\\" => {
                    return Err(TexException::new("IllegalAlignment", vec!["\\\\".into()]));
                }
                TokenType::Superscript | TokenType::Subscript => {
                    // Script with no base attaches to an empty group
                    let node = self.parse_scripts(MathNode::Group(Vec::new()))?;
                    row.push(node);
                }
                _ => {
                    let atom = self.parse_atom()?;
                    let node = self.parse_scripts(atom)?;
                    row.push(node);
                }
            }
        }
    }

    /// Collect `^`, `_`, `\limits`, `\nolimits` following `base`
    fn parse_scripts(&mut self, base: MathNode) -> Result<MathNode, TexException> {
        let mut sub = None;
        let mut sup = None;
        let mut limits = None;

        loop {
            let checkpoint = self.pos;
            self.skip_whitespace();
            let Some(token) = self.peek() else {
                self.pos = checkpoint;
                break;
            };

            match token.token_type {
                TokenType::Superscript => {
                    self.pos += 1;
                    if sup.is_some() {
                        return Err(TexException::new("DoubleSuperscript", vec![]));
                    }
                    sup = Some(Box::new(self.parse_argument("^")?));
                }
                TokenType::Subscript => {
                    self.pos += 1;
                    if sub.is_some() {
                        return Err(TexException::new("DoubleSubscript", vec![]));
                    }
                    sub = Some(Box::new(self.parse_argument("_")?));
                }
                TokenType::Command if token.text == "\\limits" || token.text == "\\nolimits" => {
                    let takes_limits = matches!(
                        base,
                        MathNode::LargeOperator { .. } | MathNode::Function { .. }
                    );
                    if !takes_limits || sub.is_some() || sup.is_some() {
                        return Err(TexException::new(
                            "MisplacedLimits",
                            vec![token.text.clone()],
                        ));
                    }
                    self.pos += 1;
                    limits = Some(token.text == "\\limits");
                }
                _ => {
                    self.pos = checkpoint;
                    break;
                }
            }
        }

        if sub.is_none() && sup.is_none() && limits.is_none() {
            return Ok(base);
        }
        Ok(MathNode::Scripts {
            base: Box::new(base),
            sub,
            sup,
            limits,
        })
    }

    /// One argument: a braced group, a single character, or a single command
    fn parse_argument(&mut self, context: &str) -> Result<MathNode, TexException> {
        self.nested(|parser| parser.parse_argument_inner(context))
    }

    fn parse_argument_inner(&mut self, context: &str) -> Result<MathNode, TexException> {
        self.skip_whitespace();
        let missing = || TexException::new("MissingArgument", vec![context.to_string()]);
        let token = self.peek().ok_or_else(missing)?;

        match token.token_type {
            TokenType::LBrace => {
                self.pos += 1;
                Ok(MathNode::Group(self.parse_row(Stop::CloseBrace)?))
            }
            TokenType::Digit => {
                self.pos += 1;
                Ok(MathNode::Number(token.text.clone()))
            }
            TokenType::RBrace
            | TokenType::Superscript
            | TokenType::Subscript
            | TokenType::Ampersand => Err(missing()),
            TokenType::Command if token.text == "\\right" => Err(missing()),
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<MathNode, TexException> {
        let token = self
            .next()
            .ok_or_else(|| TexException::new("MissingArgument", vec![]))?;

        match token.token_type {
            TokenType::Letter => Ok(MathNode::Identifier {
                tex: token.text.clone(),
                text: token.text.clone(),
                upright: false,
            }),
            TokenType::Digit => Ok(self.parse_number(&token.text)),
            TokenType::LBrace => Ok(MathNode::Group(self.parse_row(Stop::CloseBrace)?)),
            TokenType::Symbol => Ok(symbol_node(&token.text)),
            TokenType::Command => self.parse_command(token),
            _ => Err(TexException::new("MissingArgument", vec![token.text.clone()])),
        }
    }

    /// Digit run with at most one decimal point followed by a digit
    fn parse_number(&mut self, first: &str) -> MathNode {
        let mut text = first.to_string();
        let mut seen_point = false;

        while let Some(token) = self.peek() {
            match token.token_type {
                TokenType::Digit => {
                    text.push_str(&token.text);
                    self.pos += 1;
                }
                TokenType::Symbol if token.text == "." && !seen_point => {
                    let followed_by_digit = matches!(
                        self.tokens.get(self.pos + 1),
                        Some(t) if t.token_type == TokenType::Digit
                    );
                    if !followed_by_digit {
                        break;
                    }
                    seen_point = true;
                    text.push('.');
                    self.pos += 1;
                }
                _ => break,
            }
        }

        MathNode::Number(text)
    }

    fn parse_command(&mut self, token: &'a Token) -> Result<MathNode, TexException> {
        let command = token.text.as_str();

        if let Some(symbol) = symbols::lookup(command) {
            return Ok(match symbol {
                Symbol::Identifier { text, upright } => MathNode::Identifier {
                    tex: command.to_string(),
                    text: text.to_string(),
                    upright,
                },
                Symbol::Operator { text, fence } => MathNode::Operator {
                    tex: command.to_string(),
                    text: text.to_string(),
                    fence,
                },
                Symbol::LargeOperator {
                    text,
                    movable_limits,
                } => MathNode::LargeOperator {
                    tex: command.to_string(),
                    text: text.to_string(),
                    movable_limits,
                },
                Symbol::Function { limits } => MathNode::Function {
                    tex: command.to_string(),
                    limits,
                },
                Symbol::Space { width } => MathNode::Space {
                    tex: command.to_string(),
                    width: width.to_string(),
                },
            });
        }

        match command {
            "\\frac" | "\\dfrac" | "\\tfrac" | "\\binom" => {
                let numerator = self.parse_argument(command)?;
                let denominator = self.parse_argument(command)?;
                Ok(MathNode::Fraction {
                    tex: command.to_string(),
                    numerator: Box::new(numerator),
                    denominator: Box::new(denominator),
                })
            }
            "\\sqrt" => {
                self.skip_whitespace();
                let index = match self.peek() {
                    Some(t) if t.is(TokenType::Symbol, "[") => {
                        self.pos += 1;
                        let row = self.parse_row(Stop::CloseBracket)?;
                        Some(Box::new(MathNode::Group(row)))
                    }
                    _ => None,
                };
                let body = self.parse_argument(command)?;
                Ok(MathNode::Sqrt {
                    index,
                    body: Box::new(body),
                })
            }
            "\\left" => {
                let (open_tex, open) = self.parse_delimiter(command)?;
                let body = self.parse_row(Stop::Right)?;
                // parse_row(Stop::Right) only returns Ok with `\right` next
                self.pos += 1;
                let (close_tex, close) = self.parse_delimiter("\\right")?;
                Ok(MathNode::Fenced {
                    open_tex,
                    open,
                    close_tex,
                    close,
                    body,
                })
            }
            _ if TEXT_COMMANDS.contains(&command) => {
                let text = self.parse_text_argument(command)?;
                Ok(MathNode::Text {
                    tex: command.to_string(),
                    text,
                })
            }
            "\\limits" | "\\nolimits" => {
                Err(TexException::new("MisplacedLimits", vec![command.to_string()]))
            }
            _ => {
                if let Some(variant) = FontVariant::from_command(command) {
                    let body = self.parse_argument(command)?;
                    return Ok(MathNode::Font {
                        tex: command.to_string(),
                        variant,
                        body: Box::new(body),
                    });
                }
                if let Some((mark, under, stretchy)) = symbols::accent(command) {
                    let body = self.parse_argument(command)?;
                    return Ok(MathNode::Accent {
                        tex: command.to_string(),
                        mark: mark.to_string(),
                        under,
                        stretchy,
                        body: Box::new(body),
                    });
                }
                if symbols::is_reserved(command) {
                    return Err(TexException::new(
                        "ReservedCommand",
                        vec![command.to_string()],
                    ));
                }
                Err(TexException::new(
                    "UnrecognisedCommand",
                    vec![command.to_string()],
                ))
            }
        }
    }

    /// Delimiter after `\left` or `\right`
    fn parse_delimiter(&mut self, context: &str) -> Result<(String, String), TexException> {
        self.skip_whitespace();
        let token = self
            .next()
            .ok_or_else(|| TexException::new("MissingDelimiter", vec![context.to_string()]))?;
        match symbols::delimiter(&token.text) {
            Some(text) => Ok((token.text.clone(), text.to_string())),
            None => Err(TexException::new(
                "IllegalDelimiter",
                vec![token.text.clone()],
            )),
        }
    }

    /// Raw text of a `\text{...}` argument, nested braces kept
    fn parse_text_argument(&mut self, context: &str) -> Result<String, TexException> {
        self.skip_whitespace();
        let missing = || TexException::new("MissingArgument", vec![context.to_string()]);
        let first = self.next().ok_or_else(missing)?;

        if first.token_type != TokenType::LBrace {
            return match first.token_type {
                TokenType::RBrace | TokenType::Superscript | TokenType::Subscript => Err(missing()),
                _ => Ok(first.text.clone()),
            };
        }

        let mut depth = 1usize;
        let mut text = String::new();
        while let Some(token) = self.next() {
            match token.token_type {
                TokenType::LBrace => depth += 1,
                TokenType::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text);
                    }
                }
                _ => {}
            }
            text.push_str(&token.text);
        }
        Err(TexException::new("UnmatchedOpenBrace", vec![]))
    }
}

/// Node for a plain ASCII symbol character
fn symbol_node(text: &str) -> MathNode {
    let (rendered, fence) = match text {
        "-" => ("\u{2212}", false),
        "*" => ("\u{2217}", false),
        "'" => ("\u{2032}", false),
        "(" | ")" | "[" | "]" | "|" => (text, true),
        "~" => {
            return MathNode::Space {
                tex: "~".to_string(),
                width: "0.333em".to_string(),
            }
        }
        _ => (text, false),
    };
    MathNode::Operator {
        tex: text.to_string(),
        text: rendered.to_string(),
        fence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokens::tokenize;

    fn parse_str(input: &str) -> Result<Vec<MathNode>, TexException> {
        parse(&tokenize(input, 1000)?)
    }

    fn ident(c: &str) -> MathNode {
        MathNode::Identifier {
            tex: c.to_string(),
            text: c.to_string(),
            upright: false,
        }
    }

    fn error_code(input: &str) -> String {
        parse_str(input).unwrap_err().code
    }

    #[test]
    fn test_superscript() {
        let row = parse_str("x^2").unwrap();
        assert_eq!(
            row,
            vec![MathNode::Scripts {
                base: Box::new(ident("x")),
                sub: None,
                sup: Some(Box::new(MathNode::Number("2".to_string()))),
                limits: None,
            }]
        );
    }

    #[test]
    fn test_script_takes_single_digit() {
        let row = parse_str("x^23").unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row[1], MathNode::Number("3".to_string()));
    }

    #[test]
    fn test_numbers_with_decimal_point() {
        assert_eq!(parse_str("3.14").unwrap(), vec![MathNode::Number("3.14".to_string())]);
        let row = parse_str("3.x").unwrap();
        assert_eq!(row[0], MathNode::Number("3".to_string()));
    }

    #[test]
    fn test_fraction_and_sqrt() {
        let row = parse_str(r"\frac{1}{2}\sqrt[3]{x}").unwrap();
        assert!(matches!(row[0], MathNode::Fraction { .. }));
        match &row[1] {
            MathNode::Sqrt { index: Some(index), .. } => {
                assert_eq!(**index, MathNode::Group(vec![MathNode::Number("3".to_string())]));
            }
            other => panic!("Expected sqrt with index, got {:?}", other),
        }
    }

    #[test]
    fn test_left_right() {
        let row = parse_str(r"\left( x \right.").unwrap();
        match &row[0] {
            MathNode::Fenced { open, close, body, .. } => {
                assert_eq!(open, "(");
                assert_eq!(close, "");
                assert_eq!(body, &vec![ident("x")]);
            }
            other => panic!("Expected fenced, got {:?}", other),
        }
    }

    #[test]
    fn test_text_keeps_raw_content() {
        let row = parse_str(r"\text{if {x} > 0}").unwrap();
        assert_eq!(
            row[0],
            MathNode::Text {
                tex: "\\text".to_string(),
                text: "if {x} > 0".to_string(),
            }
        );
    }

    #[test]
    fn test_limits_attach_to_large_operators() {
        let row = parse_str(r"\sum\limits_{i=1}^n").unwrap();
        assert!(matches!(row[0], MathNode::Scripts { limits: Some(true), .. }));
        assert_eq!(error_code(r"x\limits"), "MisplacedLimits");
    }

    #[test]
    fn test_errors() {
        assert_eq!(error_code(r"\unknownmacro"), "UnrecognisedCommand");
        assert_eq!(error_code("{x"), "UnmatchedOpenBrace");
        assert_eq!(error_code("x}"), "UnmatchedCloseBrace");
        assert_eq!(error_code("x^2^3"), "DoubleSuperscript");
        assert_eq!(error_code("x_2_3"), "DoubleSubscript");
        assert_eq!(error_code("x^"), "MissingArgument");
        assert_eq!(error_code(r"\frac{1}"), "MissingArgument");
        assert_eq!(error_code(r"\left( x"), "UnmatchedLeft");
        assert_eq!(error_code(r"x \right)"), "UnmatchedRight");
        assert_eq!(error_code(r"\left"), "MissingDelimiter");
        assert_eq!(error_code(r"\left x \right)"), "IllegalDelimiter");
        assert_eq!(error_code(r"\newcommand"), "ReservedCommand");
        assert_eq!(error_code("a & b"), "IllegalAlignment");
        assert_eq!(error_code(r"\sqrt[3"), "MissingCloseBracket");
    }

    #[test]
    fn test_unrecognised_command_args() {
        let err = parse_str(r"x + \unknownmacro").unwrap_err();
        assert_eq!(err.args, vec!["\\unknownmacro".to_string()]);
    }

    #[test]
    fn test_nesting_limit() {
        let tokens = tokenize("{{{x}}}", 100).unwrap();
        assert!(parse_with_limit(&tokens, 4).is_ok());
        let err = parse_with_limit(&tokens, 3).unwrap_err();
        assert_eq!(err.code, "TooDeeplyNested");
        assert_eq!(err.args, vec!["3".to_string()]);

        // Chained commands nest without any braces
        let input = format!("{}x", r"\hat ".repeat(DEFAULT_MAX_NESTING));
        assert_eq!(error_code(&input), "TooDeeplyNested");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_str("").unwrap(), vec![]);
        assert_eq!(parse_str("   ").unwrap(), vec![]);
    }
}
