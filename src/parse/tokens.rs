//! Tokenizer for TeX math input
//!
//! Produces a flat list of tokens with their character positions.
//! Math mode is printable ASCII only. Inside the braced argument of a text
//! command any non-control character is accepted as a `Symbol` token.

use serde::{Deserialize, Serialize};

use crate::engine::TexException;

/// Token types for TeX math
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    /// `\alpha`, `\,`, `\{`
    Command,
    LBrace,
    RBrace,
    Superscript,
    Subscript,
    Ampersand,
    /// Consecutive whitespace collapsed into one token
    Whitespace,
    Letter,
    Digit,
    /// Any other printable ASCII character
    Symbol,
}

/// Token with metadata
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
    /// Character offset in the original input
    pub position: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, token_type: TokenType, position: usize) -> Self {
        Self {
            text: text.into(),
            token_type,
            position,
        }
    }

    pub fn is(&self, token_type: TokenType, text: &str) -> bool {
        self.token_type == token_type && self.text == text
    }
}

/// Commands whose braced argument is text rather than math
pub const TEXT_COMMANDS: [&str; 4] = ["\\text", "\\mbox", "\\textrm", "\\hbox"];

/// Split `input` into tokens, enforcing the token limit
///
/// `%` starts a comment running to the end of the line; comments are
/// dropped entirely.
pub fn tokenize(input: &str, max_tokens: usize) -> Result<Vec<Token>, TexException> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    // Brace depth inside a text argument; 0 in math mode
    let mut text_depth = 0usize;
    let mut text_pending = false;

    while i < chars.len() {
        let start = i;
        let c = chars[i];

        let token = if !c.is_ascii() {
            if text_depth == 0 {
                return Err(TexException::new("NonAsciiInMathMode", vec![c.to_string()]));
            }
            if c.is_control() {
                return Err(illegal_character(c));
            }
            single(&mut i, c, TokenType::Symbol)
        } else {
            match c {
                '\\' => {
                    i += 1;
                    match chars.get(i) {
                        None => return Err(TexException::new("IllegalFinalBackslash", vec![])),
                        Some(n) if n.is_ascii_alphabetic() => {
                            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                                i += 1;
                            }
                        }
                        Some(n) if !n.is_ascii() => {
                            return Err(TexException::new("NonAsciiInMathMode", vec![n.to_string()]));
                        }
                        Some(n) if n.is_ascii_control() && !n.is_ascii_whitespace() => {
                            return Err(illegal_character(*n));
                        }
                        Some(_) => i += 1,
                    }
                    let text: String = chars[start..i].iter().collect();
                    // "\<newline>" and "\<tab>" behave like "\ "
                    let text = if text.len() == 2 && chars[start + 1].is_ascii_whitespace() {
                        "\\ ".to_string()
                    } else {
                        text
                    };
                    Token::new(text, TokenType::Command, start)
                }
                '%' => {
                    while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                        i += 1;
                    }
                    continue;
                }
                '{' => single(&mut i, c, TokenType::LBrace),
                '}' => single(&mut i, c, TokenType::RBrace),
                '^' => single(&mut i, c, TokenType::Superscript),
                '_' => single(&mut i, c, TokenType::Subscript),
                '&' => single(&mut i, c, TokenType::Ampersand),
                '$' | '#' => return Err(illegal_character(c)),
                c if c.is_ascii_whitespace() => {
                    while i < chars.len() && chars[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    Token::new(" ", TokenType::Whitespace, start)
                }
                c if c.is_ascii_control() => return Err(illegal_character(c)),
                c if c.is_ascii_alphabetic() => single(&mut i, c, TokenType::Letter),
                c if c.is_ascii_digit() => single(&mut i, c, TokenType::Digit),
                _ => single(&mut i, c, TokenType::Symbol),
            }
        };

        match token.token_type {
            TokenType::LBrace if text_depth > 0 || text_pending => text_depth += 1,
            TokenType::RBrace => text_depth = text_depth.saturating_sub(1),
            _ => {}
        }
        text_pending = match token.token_type {
            TokenType::Command => TEXT_COMMANDS.contains(&token.text.as_str()),
            TokenType::Whitespace => text_pending,
            _ => false,
        };

        tokens.push(token);
        if tokens.len() > max_tokens {
            return Err(TexException::new(
                "TooManyTokens",
                vec![max_tokens.to_string()],
            ));
        }
    }

    log::debug!("tokenized {} chars into {} tokens", chars.len(), tokens.len());
    Ok(tokens)
}

fn single(i: &mut usize, c: char, token_type: TokenType) -> Token {
    let position = *i;
    *i += 1;
    Token::new(c.to_string(), token_type, position)
}

fn illegal_character(c: char) -> TexException {
    TexException::new("IllegalCharacter", vec![format!("U+{:04X}", c as u32)])
}
